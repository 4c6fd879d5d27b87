//! Root registry and key membership invariants.

use super::{
    EvaluationMode, InvariantViolation, PartitionContext,
    helpers::{Ancestry, ancestry},
};

pub(super) fn check_root_registry<V>(
    ctx: PartitionContext<'_, V>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    let mut roots_total = 0_usize;
    for &header in ctx.roots {
        let Some(entry) = ctx.forest.header(header) else {
            mode.record(InvariantViolation::StaleRoot { header })?;
            continue;
        };
        if let Some(parent) = entry.parent() {
            mode.record(InvariantViolation::NestedRoot { header, parent })?;
        }
        if entry.count() == 0 {
            mode.record(InvariantViolation::EmptyRoot { header })?;
        }
        roots_total += entry.count();
    }
    let keys = ctx.members.len();
    if roots_total != keys {
        mode.record(InvariantViolation::TotalCount { roots_total, keys })?;
    }
    Ok(())
}

pub(super) fn check_membership<V>(
    ctx: PartitionContext<'_, V>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    for &node in ctx.members {
        let Some(entry) = ctx.forest.node(node) else {
            mode.record(InvariantViolation::StaleMember { node })?;
            continue;
        };
        let Some(parent) = entry.parent() else {
            mode.record(InvariantViolation::DetachedMember { node })?;
            continue;
        };
        match ancestry(ctx.forest, parent) {
            Ancestry::Root(root) if ctx.roots.contains(&root) => {}
            Ancestry::Root(root) => {
                mode.record(InvariantViolation::UnregisteredRoot { node, root })?;
            }
            Ancestry::Dead(header) => {
                mode.record(InvariantViolation::DeadAncestor { node, header })?;
            }
            Ancestry::Cycle => mode.record(InvariantViolation::ParentCycle { node })?,
        }
    }
    Ok(())
}
