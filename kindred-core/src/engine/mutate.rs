//! Group mutation operations.
//!
//! Every keyed operation returns `false` without touching the partition when
//! a required key is missing. Redundant unions and relocations succeed
//! without changing anything.

use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
};

use tracing::{Span, debug, field, instrument};

use crate::{
    forest::{HeaderId, NodeId},
    telemetry,
};

use super::DisjointBase;

impl<K, V, S> DisjointBase<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Tracks `key` as a new singleton classification and returns its node.
    /// The caller must have checked that `key` is absent.
    pub(crate) fn spawn_root(&mut self, key: K, value: V) -> NodeId {
        debug_assert!(!self.keys.contains_key(&key), "key is already tracked");
        let node = self.forest.alloc_node(value);
        let root = self.forest.alloc_header();
        self.forest.append_node(root, node);
        self.keys.insert(key, node);
        self.update_roots(root);
        self.verify("add");
        node
    }

    /// Tracks `key` as a new singleton classification.
    pub(crate) fn insert_root(&mut self, key: K, value: V) -> bool {
        if self.keys.contains_key(&key) {
            return false;
        }
        self.spawn_root(key, value);
        true
    }

    /// Tracks `key` inside the classification that holds `target`. Returns
    /// `false` when `key` is already tracked or `target` is not.
    pub(crate) fn insert_under<Q>(&mut self, key: K, value: V, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.node(target) {
            Some(anchor) => self.attach_to_node(key, value, anchor),
            None => false,
        }
    }

    /// Tracks `key` inside the classification that holds `anchor`. Returns
    /// `false` when `key` is already tracked.
    pub(crate) fn attach_to_node(&mut self, key: K, value: V, anchor: NodeId) -> bool {
        if self.keys.contains_key(&key) {
            return false;
        }
        let root = self.final_header(anchor);
        let node = self.forest.alloc_node(value);
        self.forest.append_node(root, node);
        self.keys.insert(key, node);
        self.update_roots(root);
        self.verify("add_to");
        true
    }

    /// Stops tracking `key` and hands back its payload.
    pub(crate) fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.keys.remove(key)?;
        let root = self.final_header_const(node);
        let parent = self.forest.unhook_node(node);
        let pruned = self.forest.prune_from(parent);
        let value = self.forest.free_node(node);
        self.update_roots(root);
        telemetry::record_pruned(pruned);
        telemetry::record_deleted(1);
        self.verify("del");
        Some(value)
    }

    /// Removes `key` from its classification.
    ///
    /// Returns `false` when the key is not tracked.
    pub fn del<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes every key that shares a classification with `key`, `key`
    /// included.
    ///
    /// The key map is scanned once, so the cost is linear in the total
    /// number of tracked keys. Returns `false` when the key is not tracked.
    #[instrument(
        name = "partition.del_all",
        level = "debug",
        skip_all,
        fields(removed = field::Empty, freed_headers = field::Empty),
    )]
    pub fn del_all<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(node) = self.node(key) else {
            return false;
        };
        let root = self.final_header_const(node);
        let before = self.keys.len();
        let forest = &self.forest;
        self.keys
            .retain(|_, member| forest.root_of(*member) != Some(root));
        let removed = before - self.keys.len();
        let freed_headers = self.release_root(root);
        record_teardown(removed, freed_headers);
        debug!(removed, freed_headers, "deleted classification");
        self.verify("del_all");
        true
    }

    /// Removes every other key of `key`'s classification and leaves `key` as
    /// a fresh singleton.
    ///
    /// Linear in the total number of tracked keys. Returns `false` when the
    /// key is not tracked.
    #[instrument(
        name = "partition.del_except",
        level = "debug",
        skip_all,
        fields(removed = field::Empty, freed_headers = field::Empty),
    )]
    pub fn del_except<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(node) = self.node(key) else {
            return false;
        };
        let root = self.final_header_const(node);
        self.forest.unhook_node(node);
        let before = self.keys.len();
        let forest = &self.forest;
        self.keys
            .retain(|_, member| *member == node || forest.root_of(*member) != Some(root));
        let removed = before - self.keys.len();
        let freed_headers = self.release_root(root);
        self.rehome_as_singleton(node);
        record_teardown(removed, freed_headers);
        debug!(removed, freed_headers, "kept one key of classification");
        self.verify("del_except");
        true
    }

    /// Moves `key` out of its classification into a fresh singleton.
    ///
    /// Returns `false` when the key is not tracked.
    pub fn join<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(node) = self.node(key) else {
            return false;
        };
        self.detach(node);
        self.rehome_as_singleton(node);
        self.verify("join");
        true
    }

    /// Moves `key` into the classification that holds `target`.
    ///
    /// Succeeds without change when both keys are already siblings. Returns
    /// `false` when either key is not tracked.
    pub fn join_to<Q>(&mut self, key: &Q, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(node), Some(anchor)) = (self.node(key), self.node(target)) else {
            return false;
        };
        if node == anchor || self.final_header_const(node) == self.final_header_const(anchor) {
            return true;
        }
        self.detach(node);
        let root = self.final_header(anchor);
        self.forest.append_node(root, node);
        self.update_roots(root);
        self.verify("join_to");
        true
    }

    /// Unites the classifications holding `x` and `y`.
    ///
    /// The root of `y`'s classification is spliced beneath the root of `x`'s
    /// classification. Succeeds without change when both keys are already
    /// siblings. Returns `false` when either key is not tracked.
    #[instrument(name = "partition.merge", level = "debug", skip_all)]
    pub fn merge<Q>(&mut self, x: &Q, y: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(left), Some(right)) = (self.node(x), self.node(y)) else {
            return false;
        };
        if left == right || self.final_header_const(left) == self.final_header_const(right) {
            return true;
        }
        let survivor = self.final_header(left);
        let absorbed = self.final_header(right);
        self.forest.append_header(survivor, absorbed);
        self.update_roots(survivor);
        self.update_roots(absorbed);
        debug!(survivor = %survivor, absorbed = %absorbed, "merged classifications");
        telemetry::record_merge();
        self.verify("merge");
        true
    }

    /// Removes every key and classification.
    #[instrument(
        name = "partition.clear",
        level = "debug",
        skip_all,
        fields(removed = field::Empty, freed_headers = field::Empty),
    )]
    pub fn clear(&mut self) {
        let removed = self.keys.len();
        let headers = self.forest.live_headers();
        self.roots.clear();
        self.keys.clear();
        self.forest.reset();
        record_teardown(removed, headers);
        debug!(removed, "cleared partition");
        self.verify("clear");
    }

    /// Unhooks `node` from its classification, pruning emptied headers and
    /// releasing the root when nothing is left under it.
    fn detach(&mut self, node: NodeId) {
        let root = self.final_header_const(node);
        let parent = self.forest.unhook_node(node);
        let pruned = self.forest.prune_from(parent);
        telemetry::record_pruned(pruned);
        self.update_roots(root);
    }

    fn rehome_as_singleton(&mut self, node: NodeId) {
        let fresh = self.forest.alloc_header();
        self.forest.append_node(fresh, node);
        self.update_roots(fresh);
    }

    /// Unregisters `root` and frees its whole subtree. Returns how many
    /// headers were released.
    fn release_root(&mut self, root: HeaderId) -> usize {
        let headers = self.forest.live_headers();
        self.roots.remove(&root);
        self.forest.free_subtree(root);
        headers - self.forest.live_headers()
    }
}

fn record_teardown(removed: usize, freed_headers: usize) {
    let span = Span::current();
    span.record("removed", removed);
    span.record("freed_headers", freed_headers);
    telemetry::record_deleted(removed);
}
