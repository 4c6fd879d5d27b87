//! Intrusive list primitives shared by headers and nodes.
//!
//! Every primitive is O(1) in the list it edits and O(depth) in the count
//! propagation up the ancestor chain.

use tracing::trace;

use super::{Forest, HeaderId, NodeId};

impl<V> Forest<V> {
    /// Pushes a detached node onto the tail of `header`'s node list.
    pub(crate) fn append_node(&mut self, header: HeaderId, node: NodeId) {
        let tail = self.header_at(header).last_node;
        let entry = self.node_at_mut(node);
        debug_assert!(entry.parent.is_none(), "node {node} is already attached");
        entry.left = tail;
        entry.right = None;
        entry.parent = Some(header);
        match tail {
            Some(prev) => self.node_at_mut(prev).right = Some(node),
            None => self.header_at_mut(header).first_node = Some(node),
        }
        self.header_at_mut(header).last_node = Some(node);
        self.raise_counts(header, 1);
    }

    /// Splices the root header `child` under `parent`.
    ///
    /// `child` stops being a root and its whole count flows into `parent`
    /// and every ancestor above it.
    pub(crate) fn append_header(&mut self, parent: HeaderId, child: HeaderId) {
        debug_assert_ne!(parent, child, "a header cannot adopt itself");
        debug_assert!(
            self.header_at(child).parent.is_none(),
            "only root headers can be spliced"
        );
        let tail = self.header_at(parent).last_child;
        let entry = self.header_at_mut(child);
        entry.left = tail;
        entry.right = None;
        entry.parent = Some(parent);
        let moved = entry.count;
        match tail {
            Some(prev) => self.header_at_mut(prev).right = Some(child),
            None => self.header_at_mut(parent).first_child = Some(child),
        }
        self.header_at_mut(parent).last_child = Some(child);
        self.raise_counts(parent, moved);
    }

    /// Detaches `node` from its header and returns that header.
    ///
    /// # Panics
    /// Panics when the node is not attached.
    pub(crate) fn unhook_node(&mut self, node: NodeId) -> HeaderId {
        let entry = self.node_at_mut(node);
        let parent = entry
            .parent
            .take()
            .unwrap_or_else(|| panic!("node {node} is not attached to a header"));
        let (left, right) = (entry.left.take(), entry.right.take());
        match left {
            Some(prev) => self.node_at_mut(prev).right = right,
            None => self.header_at_mut(parent).first_node = right,
        }
        match right {
            Some(next) => self.node_at_mut(next).left = left,
            None => self.header_at_mut(parent).last_node = left,
        }
        self.lower_counts(parent, 1);
        parent
    }

    /// Detaches an empty header from its parent and returns the parent.
    ///
    /// # Panics
    /// Panics when the header still holds nodes or child headers, or when it
    /// is a root. Either case means a caller skipped the emptiness check and
    /// continuing would corrupt the tree.
    pub(crate) fn unhook_header(&mut self, header: HeaderId) -> HeaderId {
        let entry = self.header_at_mut(header);
        assert!(
            entry.is_bare(),
            "header {header} must be empty before it is unhooked (count {})",
            entry.count
        );
        let parent = entry
            .parent
            .take()
            .unwrap_or_else(|| panic!("root header {header} has no parent to leave"));
        let (left, right) = (entry.left.take(), entry.right.take());
        match left {
            Some(prev) => self.header_at_mut(prev).right = right,
            None => self.header_at_mut(parent).first_child = right,
        }
        match right {
            Some(next) => self.header_at_mut(next).left = left,
            None => self.header_at_mut(parent).last_child = left,
        }
        parent
    }

    /// Frees every empty non-root header from `header` upwards.
    ///
    /// Stops at the first header that still has content or at the root, and
    /// returns how many headers were released.
    pub(crate) fn prune_from(&mut self, header: HeaderId) -> usize {
        let mut cursor = header;
        let mut pruned = 0_usize;
        loop {
            let entry = self.header_at(cursor);
            if entry.parent.is_none() || entry.count != 0 {
                break;
            }
            let parent = self.unhook_header(cursor);
            self.free_header(cursor);
            trace!(header = %cursor, parent = %parent, "pruned empty header");
            pruned += 1;
            cursor = parent;
        }
        pruned
    }

    fn raise_counts(&mut self, from: HeaderId, delta: usize) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let entry = self.header_at_mut(id);
            entry.count += delta;
            cursor = entry.parent;
        }
    }

    fn lower_counts(&mut self, from: HeaderId, delta: usize) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let entry = self.header_at_mut(id);
            entry.count = entry
                .count
                .checked_sub(delta)
                .unwrap_or_else(|| panic!("subtree count of header {id} underflowed"));
            cursor = entry.parent;
        }
    }
}
