//! Construction-time settings shared by every partition flavour.

/// Controls whether the structural invariant checker runs automatically.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Verification {
    /// Invariants are only checked when a caller asks for them.
    #[default]
    Off,
    /// Every successful mutation is followed by a full invariant sweep; a
    /// violation is logged at `error` level and then panics.
    AfterMutation,
}

/// Settings applied when a partition is created.
///
/// # Examples
/// ```
/// use kindred_core::{PartitionConfig, Verification};
///
/// let config = PartitionConfig::default()
///     .with_capacity(128)
///     .with_verification(Verification::AfterMutation);
/// assert_eq!(config.capacity(), 128);
/// assert_eq!(config.verification(), Verification::AfterMutation);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PartitionConfig {
    capacity: usize,
    verification: Verification,
}

impl PartitionConfig {
    /// Pre-sizes the key map and node arena for `capacity` keys.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Selects when the invariant checker runs.
    #[must_use]
    pub const fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    /// Returns the number of keys the partition is pre-sized for.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured verification mode.
    #[must_use]
    pub const fn verification(&self) -> Verification {
        self.verification
    }

    pub(crate) fn verifies_mutations(&self) -> bool {
        self.verification == Verification::AfterMutation
    }
}
