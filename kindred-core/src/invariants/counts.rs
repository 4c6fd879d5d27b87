//! Subtree count invariant.
//!
//! A header's count must equal its direct nodes plus the counts of its child
//! headers. Headers whose lists cannot be read are left to the linkage
//! checks.

use super::{
    EvaluationMode, InvariantViolation, PartitionContext,
    helpers::{header_list, node_list},
};

pub(super) fn check_subtree_counts<V>(
    ctx: PartitionContext<'_, V>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    for (header, entry) in ctx.forest.headers_iter() {
        if !entry.is_root() && entry.count() == 0 {
            mode.record(InvariantViolation::UnprunedHeader { header })?;
        }
        let (Ok(nodes), Ok(children)) = (
            node_list(ctx.forest, header),
            header_list(ctx.forest, header),
        ) else {
            continue;
        };
        let nested: usize = children
            .iter()
            .filter_map(|&child| ctx.forest.header(child))
            .map(|child| child.count())
            .sum();
        let expected = nodes.len() + nested;
        if entry.count() != expected {
            mode.record(InvariantViolation::SubtreeCount {
                header,
                recorded: entry.count(),
                expected,
            })?;
        }
    }
    Ok(())
}
