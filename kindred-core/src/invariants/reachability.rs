//! Reachability invariant.
//!
//! Walks down from every registered root and accounts for each live slot:
//! nothing may be live without being reachable, and every reachable node must
//! be tracked by a key. Lists that fail to read are skipped here and reported
//! by the linkage checks.

use std::collections::HashSet;

use crate::forest::{HeaderId, NodeId};

use super::{
    EvaluationMode, InvariantViolation, PartitionContext,
    helpers::{header_list, node_list},
};

pub(super) fn check_reachability<V>(
    ctx: PartitionContext<'_, V>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    let (headers, nodes) = walk_from_roots(ctx);
    for (header, _) in ctx.forest.headers_iter() {
        if !headers.contains(&header) {
            mode.record(InvariantViolation::LeakedHeader { header })?;
        }
    }
    let members: HashSet<NodeId> = ctx.members.iter().copied().collect();
    for (node, _) in ctx.forest.nodes_iter() {
        if !nodes.contains(&node) {
            mode.record(InvariantViolation::LeakedNode { node })?;
        } else if !members.contains(&node) {
            mode.record(InvariantViolation::UnkeyedNode { node })?;
        }
    }
    Ok(())
}

fn walk_from_roots<V>(ctx: PartitionContext<'_, V>) -> (HashSet<HeaderId>, HashSet<NodeId>) {
    let mut headers = HashSet::new();
    let mut nodes = HashSet::new();
    let mut stack: Vec<HeaderId> = ctx
        .roots
        .iter()
        .copied()
        .filter(|&root| ctx.forest.header(root).is_some())
        .collect();
    while let Some(header) = stack.pop() {
        if !headers.insert(header) {
            continue;
        }
        if let Ok(direct) = node_list(ctx.forest, header) {
            nodes.extend(direct);
        }
        if let Ok(children) = header_list(ctx.forest, header) {
            stack.extend(children);
        }
    }
    (headers, nodes)
}
