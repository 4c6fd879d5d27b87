//! Root resolution, path compression and root-set bookkeeping.

use tracing::trace;

use crate::{
    forest::{HeaderId, NodeId},
    telemetry,
};

use super::DisjointBase;

impl<K, V, S> DisjointBase<K, V, S> {
    /// Resolves `node` to its root header and rehooks it directly beneath
    /// that root when it sat deeper. Headers emptied by the move are pruned.
    ///
    /// # Panics
    /// Panics when `node` is not live and attached.
    pub(crate) fn final_header(&mut self, node: NodeId) -> HeaderId {
        let parent = self
            .forest
            .node_at(node)
            .parent()
            .unwrap_or_else(|| panic!("node {node} is not attached to a header"));
        let root = self.final_header_const(node);
        if root != parent {
            self.forest.unhook_node(node);
            self.forest.append_node(root, node);
            let pruned = self.forest.prune_from(parent);
            trace!(node = %node, root = %root, pruned, "compressed path");
            telemetry::record_compression();
            telemetry::record_pruned(pruned);
        }
        root
    }

    /// Resolves `node` to its root header without touching the tree.
    ///
    /// # Panics
    /// Panics when `node` is not live and attached.
    pub(crate) fn final_header_const(&self, node: NodeId) -> HeaderId {
        self.forest
            .root_of(node)
            .unwrap_or_else(|| panic!("node {node} does not resolve to a root"))
    }

    /// Brings the root registry in line with `header` after a mutation.
    ///
    /// An empty root is released, a populated root is registered and a
    /// header that now has a parent is dropped from the registry.
    pub(crate) fn update_roots(&mut self, header: HeaderId) {
        let entry = self.forest.header_at(header);
        match (entry.parent(), entry.count()) {
            (None, 0) => {
                self.roots.remove(&header);
                self.forest.free_header(header);
                trace!(header = %header, "released empty root");
            }
            (None, _) => {
                self.roots.insert(header);
            }
            (Some(_), _) => {
                self.roots.remove(&header);
            }
        }
    }
}
