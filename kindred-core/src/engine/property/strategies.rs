//! Strategy builders for engine property tests.

use proptest::{collection::vec, prelude::*};

use super::types::{KEY_SPACE, Operation};

const MAX_STEPS: usize = 64;

/// Sequences of operations that open with a few additions so later steps
/// have keys to act on.
pub(super) fn operation_sequences() -> impl Strategy<Value = Vec<Operation>> {
    (
        vec(0..KEY_SPACE, 0..=usize::from(KEY_SPACE)),
        vec(any::<Operation>(), 1..MAX_STEPS),
    )
        .prop_map(|(seeds, steps)| {
            seeds
                .into_iter()
                .map(|key| Operation::Add { key })
                .chain(steps)
                .collect()
        })
}

/// A pair of keys from the shared key space.
pub(super) fn key_pair() -> impl Strategy<Value = (u8, u8)> {
    (0..KEY_SPACE, 0..KEY_SPACE)
}
