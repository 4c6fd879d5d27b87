//! Benchmark setup error type.
//!
//! Setup functions propagate these with `?` instead of panicking, so a bad
//! parameter table fails with a readable message.

use kindred_core::InvariantViolation;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
    /// The requested workload has more keys than the key type can name.
    #[error("{requested} keys requested but at most {limit} are supported")]
    TooManyKeys {
        /// Keys the parameters ask for.
        requested: usize,
        /// Largest supported key count.
        limit: usize,
    },
    /// The generated partition failed its structural checks.
    #[error("generated partition is malformed: {0}")]
    Malformed(#[from] InvariantViolation),
}
