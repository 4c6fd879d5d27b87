//! Traversal, root resolution and teardown over the forest.

use std::iter::FusedIterator;

use super::{Forest, HeaderId, NodeId};

/// Double-ended iterator over a header's direct node list.
#[derive(Debug)]
pub struct NodeIter<'a, V> {
    forest: &'a Forest<V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<V> Iterator for NodeIter<'_, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.forest.node_at(current).right;
        }
        Some(current)
    }
}

impl<V> DoubleEndedIterator for NodeIter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.forest.node_at(current).left;
        }
        Some(current)
    }
}

impl<V> FusedIterator for NodeIter<'_, V> {}

/// Double-ended iterator over a header's child header list.
#[derive(Debug)]
pub struct HeaderIter<'a, V> {
    forest: &'a Forest<V>,
    front: Option<HeaderId>,
    back: Option<HeaderId>,
}

impl<V> Iterator for HeaderIter<'_, V> {
    type Item = HeaderId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.forest.header_at(current).right;
        }
        Some(current)
    }
}

impl<V> DoubleEndedIterator for HeaderIter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.forest.header_at(current).left;
        }
        Some(current)
    }
}

impl<V> FusedIterator for HeaderIter<'_, V> {}

#[derive(Clone, Copy, Debug)]
enum Frame {
    Expand(HeaderId),
    Emit(HeaderId),
}

/// Iterator over every node beneath a header.
///
/// The forward walk is a pre-order: a header's own nodes first, then each
/// child subtree from first to last. The reverse walk yields exactly the
/// same sequence backwards. Both keep an explicit stack, so the depth of the
/// classification tree never touches the call stack.
#[derive(Debug)]
pub struct Descendants<'a, V> {
    forest: &'a Forest<V>,
    stack: Vec<Frame>,
    current: Option<NodeIter<'a, V>>,
    reverse: bool,
}

impl<'a, V> Descendants<'a, V> {
    fn expand(&mut self, header: HeaderId) {
        let forest: &'a Forest<V> = self.forest;
        let children = forest.headers(header);
        if self.reverse {
            self.stack.push(Frame::Emit(header));
            self.stack.extend(children.map(Frame::Expand));
        } else {
            self.stack.extend(children.rev().map(Frame::Expand));
            self.current = Some(forest.nodes(header));
        }
    }
}

impl<'a, V> Iterator for Descendants<'a, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                let next = if self.reverse {
                    iter.next_back()
                } else {
                    iter.next()
                };
                if next.is_some() {
                    return next;
                }
                self.current = None;
            }
            match self.stack.pop()? {
                Frame::Expand(header) => self.expand(header),
                Frame::Emit(header) => {
                    let forest: &'a Forest<V> = self.forest;
                    self.current = Some(forest.nodes(header));
                }
            }
        }
    }
}

impl<V> FusedIterator for Descendants<'_, V> {}

impl<V> Forest<V> {
    /// Iterates over the direct nodes of `header`, first to last.
    ///
    /// # Panics
    /// Panics when `header` is not live.
    pub fn nodes(&self, header: HeaderId) -> NodeIter<'_, V> {
        let entry = self.header_at(header);
        NodeIter {
            forest: self,
            front: entry.first_node,
            back: entry.last_node,
        }
    }

    /// Iterates over the child headers of `header`, first to last.
    ///
    /// # Panics
    /// Panics when `header` is not live.
    pub fn headers(&self, header: HeaderId) -> HeaderIter<'_, V> {
        let entry = self.header_at(header);
        HeaderIter {
            forest: self,
            front: entry.first_child,
            back: entry.last_child,
        }
    }

    /// Iterates over every node beneath `header` in pre-order.
    ///
    /// # Panics
    /// Panics when `header` is not live.
    pub fn descendants(&self, header: HeaderId) -> Descendants<'_, V> {
        let mut walk = Descendants {
            forest: self,
            stack: Vec::new(),
            current: None,
            reverse: false,
        };
        walk.expand(header);
        walk
    }

    /// Iterates over every node beneath `header` in reverse pre-order.
    ///
    /// # Panics
    /// Panics when `header` is not live.
    pub fn descendants_rev(&self, header: HeaderId) -> Descendants<'_, V> {
        let mut walk = Descendants {
            forest: self,
            stack: Vec::new(),
            current: None,
            reverse: true,
        };
        walk.expand(header);
        walk
    }

    /// Follows parent links from `node` to the root header without changing
    /// the tree. Returns `None` when the node is free or detached.
    #[must_use]
    pub fn root_of(&self, node: NodeId) -> Option<HeaderId> {
        let mut cursor = self.node(node)?.parent?;
        while let Some(parent) = self.header(cursor)?.parent {
            cursor = parent;
        }
        Some(cursor)
    }

    /// Number of header hops between `node` and its root; a node sitting
    /// directly under the root has depth 1.
    #[must_use]
    pub fn depth_of(&self, node: NodeId) -> Option<usize> {
        let mut cursor = self.node(node)?.parent?;
        let mut depth = 1_usize;
        while let Some(parent) = self.header(cursor)?.parent {
            cursor = parent;
            depth += 1;
        }
        Some(depth)
    }

    /// Releases `header`, every header beneath it and every node those
    /// headers hold. Returns the number of nodes released.
    ///
    /// `header` must be a root, or already unhooked from its parent. Each
    /// sibling link is read before the slot holding it is released.
    pub(crate) fn free_subtree(&mut self, header: HeaderId) -> usize {
        debug_assert!(
            self.header_at(header).parent.is_none(),
            "subtree teardown must start at a root"
        );
        let mut released = 0_usize;
        let mut stack = vec![header];
        while let Some(current) = stack.pop() {
            let entry = self.take_header(current);
            let mut child = entry.last_child;
            while let Some(id) = child {
                child = self.header_at(id).left;
                stack.push(id);
            }
            let mut cursor = entry.first_node;
            while let Some(id) = cursor {
                cursor = self.take_node(id).right;
                released += 1;
            }
        }
        released
    }
}
