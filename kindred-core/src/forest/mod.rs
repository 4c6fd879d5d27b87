//! Arena-backed header/node forest underpinning every partition.
//!
//! Each classification is a tree of [`Header`]s. A header owns an ordered
//! list of [`Node`]s (one per tracked key) and an ordered list of child
//! headers, and records how many nodes live anywhere beneath it. All links are
//! handles into the arena, so freeing a slot only returns it to a free list.
//!
//! The mutating list primitives live in `links`, traversal and teardown in
//! `walk`. Both are crate-internal; callers outside the crate observe the
//! forest through the read accessors below.

mod links;
mod walk;

use std::fmt;

pub use self::walk::{Descendants, HeaderIter, NodeIter};

/// Handle naming a node slot in a [`Forest`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena slot index behind this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle naming a header slot in a [`Forest`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HeaderId(usize);

impl HeaderId {
    /// Returns the arena slot index behind this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HeaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Membership record for one tracked key.
#[derive(Clone, Debug)]
pub struct Node<V> {
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<HeaderId>,
    pub(crate) value: V,
}

impl<V> Node<V> {
    const fn detached(value: V) -> Self {
        Self {
            left: None,
            right: None,
            parent: None,
            value,
        }
    }

    /// Header whose node list holds this node.
    #[must_use]
    pub const fn parent(&self) -> Option<HeaderId> {
        self.parent
    }

    /// Previous node in the parent's node list.
    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Next node in the parent's node list.
    #[must_use]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Payload carried by the node.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }
}

/// Grouping vertex of a classification tree.
#[derive(Clone, Debug, Default)]
pub struct Header {
    pub(crate) parent: Option<HeaderId>,
    pub(crate) left: Option<HeaderId>,
    pub(crate) right: Option<HeaderId>,
    pub(crate) first_child: Option<HeaderId>,
    pub(crate) last_child: Option<HeaderId>,
    pub(crate) first_node: Option<NodeId>,
    pub(crate) last_node: Option<NodeId>,
    pub(crate) count: usize,
}

impl Header {
    /// Parent header, absent for the root of a classification.
    #[must_use]
    pub const fn parent(&self) -> Option<HeaderId> {
        self.parent
    }

    /// Returns `true` when the header is the root of a classification.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Previous sibling in the parent's header list.
    #[must_use]
    pub const fn left(&self) -> Option<HeaderId> {
        self.left
    }

    /// Next sibling in the parent's header list.
    #[must_use]
    pub const fn right(&self) -> Option<HeaderId> {
        self.right
    }

    /// First child header.
    #[must_use]
    pub const fn first_child(&self) -> Option<HeaderId> {
        self.first_child
    }

    /// Last child header.
    #[must_use]
    pub const fn last_child(&self) -> Option<HeaderId> {
        self.last_child
    }

    /// First node of the direct node list.
    #[must_use]
    pub const fn first_node(&self) -> Option<NodeId> {
        self.first_node
    }

    /// Last node of the direct node list.
    #[must_use]
    pub const fn last_node(&self) -> Option<NodeId> {
        self.last_node
    }

    /// Number of nodes anywhere beneath this header.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    const fn is_bare(&self) -> bool {
        self.count == 0
            && self.first_child.is_none()
            && self.last_child.is_none()
            && self.first_node.is_none()
            && self.last_node.is_none()
    }
}

/// Slot arena owning every header and node of a partition.
pub struct Forest<V> {
    nodes: Vec<Option<Node<V>>>,
    headers: Vec<Option<Header>>,
    free_nodes: Vec<NodeId>,
    free_headers: Vec<HeaderId>,
}

impl<V> Default for Forest<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Forest<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forest")
            .field("live_nodes", &self.live_nodes())
            .field("live_headers", &self.live_headers())
            .field("node_slots", &self.nodes.len())
            .field("header_slots", &self.headers.len())
            .finish()
    }
}

impl<V> Forest<V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            headers: Vec::new(),
            free_nodes: Vec::new(),
            free_headers: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            headers: Vec::with_capacity(nodes),
            free_nodes: Vec::new(),
            free_headers: Vec::new(),
        }
    }

    /// Returns the node behind `id`, or `None` when the slot is free.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Returns the header behind `id`, or `None` when the slot is free.
    #[must_use]
    pub fn header(&self, id: HeaderId) -> Option<&Header> {
        self.headers.get(id.0).and_then(Option::as_ref)
    }

    /// Number of allocated node slots, live or free.
    #[must_use]
    pub fn node_slots(&self) -> usize {
        self.nodes.len()
    }

    /// Number of allocated header slots, live or free.
    #[must_use]
    pub fn header_slots(&self) -> usize {
        self.headers.len()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    /// Number of live headers.
    #[must_use]
    pub fn live_headers(&self) -> usize {
        self.headers.len() - self.free_headers.len()
    }

    /// Iterates over every live node with its handle.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeId, &Node<V>)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|node| (NodeId(idx), node)))
    }

    /// Iterates over every live header with its handle.
    pub fn headers_iter(&self) -> impl Iterator<Item = (HeaderId, &Header)> {
        self.headers
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|header| (HeaderId(idx), header)))
    }

    pub(crate) fn alloc_node(&mut self, value: V) -> NodeId {
        let node = Node::detached(value);
        if let Some(id) = self.free_nodes.pop() {
            let slot = self
                .nodes
                .get_mut(id.0)
                .expect("free list only holds allocated node slots");
            debug_assert!(slot.is_none(), "free node slot {id} is occupied");
            *slot = Some(node);
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Some(node));
            id
        }
    }

    pub(crate) fn alloc_header(&mut self) -> HeaderId {
        if let Some(id) = self.free_headers.pop() {
            let slot = self
                .headers
                .get_mut(id.0)
                .expect("free list only holds allocated header slots");
            debug_assert!(slot.is_none(), "free header slot {id} is occupied");
            *slot = Some(Header::default());
            id
        } else {
            let id = HeaderId(self.headers.len());
            self.headers.push(Some(Header::default()));
            id
        }
    }

    /// Releases a node slot and hands back its payload.
    ///
    /// The node must already be unhooked; releasing a linked node would leave
    /// its neighbours pointing at a free slot.
    pub(crate) fn free_node(&mut self, id: NodeId) -> V {
        let node = self.take_node(id);
        debug_assert!(
            node.parent.is_none(),
            "node {id} must be unhooked before it is freed"
        );
        node.value
    }

    /// Releases an empty, unhooked header slot.
    pub(crate) fn free_header(&mut self, id: HeaderId) {
        let header = self.take_header(id);
        debug_assert!(header.is_bare(), "header {id} must be empty when freed");
        debug_assert!(
            header.parent.is_none(),
            "header {id} must be unhooked before it is freed"
        );
    }

    pub(super) fn take_node(&mut self, id: NodeId) -> Node<V> {
        let node = self
            .nodes
            .get_mut(id.0)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("node {id} freed twice or never allocated"));
        self.free_nodes.push(id);
        node
    }

    pub(super) fn take_header(&mut self, id: HeaderId) -> Header {
        let header = self
            .headers
            .get_mut(id.0)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("header {id} freed twice or never allocated"));
        self.free_headers.push(id);
        header
    }

    /// Drops every slot and free list.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.headers.clear();
        self.free_nodes.clear();
        self.free_headers.clear();
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    pub(crate) fn node_at(&self, id: NodeId) -> &Node<V> {
        self.node(id)
            .unwrap_or_else(|| panic!("node handle {id} must be live"))
    }

    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("node handle {id} must be live"))
    }

    pub(crate) fn header_at(&self, id: HeaderId) -> &Header {
        self.header(id)
            .unwrap_or_else(|| panic!("header handle {id} must be live"))
    }

    pub(crate) fn header_at_mut(&mut self, id: HeaderId) -> &mut Header {
        self.headers
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("header handle {id} must be live"))
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    #[cfg(test)]
    pub(crate) fn header_mut(&mut self, id: HeaderId) -> Option<&mut Header> {
        self.headers.get_mut(id.0).and_then(Option::as_mut)
    }
}
