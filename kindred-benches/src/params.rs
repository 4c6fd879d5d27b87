//! Benchmark parameter types.

use std::fmt;

/// Parameters for a path-compression benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct ChainParams {
    /// Number of keys; each merge nests the existing chain one level deeper.
    pub key_count: usize,
    /// Seed for the order in which keys are resolved.
    pub seed: u64,
}

impl fmt::Display for ChainParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth={}", self.key_count)
    }
}

/// Parameters for a classification teardown benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct TeardownParams {
    /// Number of classifications in the partition.
    pub group_count: usize,
    /// Keys per classification.
    pub group_size: usize,
}

impl TeardownParams {
    /// Total number of keys the workload tracks.
    #[must_use]
    pub const fn key_count(&self) -> usize {
        self.group_count.saturating_mul(self.group_size)
    }
}

impl fmt::Display for TeardownParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "groups={},size={}", self.group_count, self.group_size)
    }
}
