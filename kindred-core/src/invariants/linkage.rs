//! Doubly linked list invariants for node and child-header lists.
//!
//! Each live header's lists must have matching ends and back links, and
//! every member must record the header as its parent.

use tracing::trace;

use super::{
    EvaluationMode, InvariantViolation, PartitionContext,
    helpers::{header_list, node_list},
};

pub(super) fn check_node_links<V>(
    ctx: PartitionContext<'_, V>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    trace!(headers = ctx.forest.live_headers(), "checking node lists");
    for (header, _) in ctx.forest.headers_iter() {
        let nodes = match node_list(ctx.forest, header) {
            Ok(nodes) => nodes,
            Err(defect) => {
                mode.record(InvariantViolation::NodeList { header, defect })?;
                continue;
            }
        };
        for node in nodes {
            let recorded = ctx.forest.node(node).and_then(|entry| entry.parent());
            if recorded != Some(header) {
                mode.record(InvariantViolation::NodeParent {
                    header,
                    node,
                    recorded,
                })?;
            }
        }
    }
    Ok(())
}

pub(super) fn check_header_links<V>(
    ctx: PartitionContext<'_, V>,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    trace!(headers = ctx.forest.live_headers(), "checking header lists");
    for (header, _) in ctx.forest.headers_iter() {
        let children = match header_list(ctx.forest, header) {
            Ok(children) => children,
            Err(defect) => {
                mode.record(InvariantViolation::HeaderList { header, defect })?;
                continue;
            }
        };
        for child in children {
            let recorded = ctx.forest.header(child).and_then(|entry| entry.parent());
            if recorded != Some(header) {
                mode.record(InvariantViolation::HeaderParent {
                    header,
                    child,
                    recorded,
                })?;
            }
        }
    }
    Ok(())
}
