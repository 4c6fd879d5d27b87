//! Drives the engine and the label model in lockstep.

use proptest::{
    prop_assert, prop_assert_eq,
    test_runner::{TestCaseError, TestCaseResult},
};
use tracing::debug;

use super::{
    model::LabelModel,
    types::{KEY_SPACE, Operation},
};
use crate::engine::DisjointBase;

/// Applies `operation` to the engine, building payloads with `value`.
pub(super) fn apply<V>(
    base: &mut DisjointBase<u8, V>,
    operation: Operation,
    value: impl Fn(u8) -> V,
) -> bool {
    match operation {
        Operation::Add { key } => base.insert_root(key, value(key)),
        Operation::AddTo { key, target } => base.insert_under(key, value(key), &target),
        Operation::Del { key } => base.del(&key),
        Operation::DelAll { key } => base.del_all(&key),
        Operation::DelExcept { key } => base.del_except(&key),
        Operation::Join { key } => base.join(&key),
        Operation::JoinTo { key, target } => base.join_to(&key, &target),
        Operation::Merge { x, y } => base.merge(&x, &y),
        Operation::Find { key } => base.find(&key).is_some(),
    }
}

/// Runs `operations` against both sides, comparing after every step.
pub(super) fn run_in_lockstep<V>(
    base: &mut DisjointBase<u8, V>,
    model: &mut LabelModel,
    operations: &[Operation],
    value: impl Fn(u8) -> V,
) -> TestCaseResult {
    for (step, &operation) in operations.iter().enumerate() {
        let expected = model.apply(operation);
        let reported = apply(base, operation, &value);
        prop_assert_eq!(reported, expected, "step {} ({:?}) outcome", step, operation);
        assert_agrees(base, model).map_err(|err| {
            debug!(step, ?operation, %err, "engine diverged from model");
            TestCaseError::fail(format!("step {step} ({operation:?}): {err}"))
        })?;
    }
    Ok(())
}

/// Sorted groups of sorted keys.
pub(super) fn engine_groups<V>(base: &DisjointBase<u8, V>) -> Vec<Vec<u8>> {
    let mut groups: Vec<Vec<u8>> = base
        .groups()
        .into_iter()
        .map(|group| {
            let mut keys: Vec<u8> = group.into_iter().copied().collect();
            keys.sort_unstable();
            keys
        })
        .collect();
    groups.sort();
    groups
}

pub(super) fn assert_agrees<V>(base: &DisjointBase<u8, V>, model: &LabelModel) -> TestCaseResult {
    prop_assert_eq!(base.len(), model.len());
    prop_assert_eq!(base.classification(), model.classification());
    prop_assert_eq!(engine_groups(base), model.groups());
    for key in 0..KEY_SPACE {
        prop_assert_eq!(base.contains(&key), model.contains(key));
        prop_assert_eq!(base.sibling_count(&key), model.sibling_count(key));
    }
    let violations = base.invariants().collect_all();
    prop_assert!(violations.is_empty(), "invariants violated: {:?}", violations);
    Ok(())
}
