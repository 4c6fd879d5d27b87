//! Keyed partition engine shared by the set and map facades.
//!
//! [`DisjointBase`] maps every tracked key to a node in the [`Forest`] and
//! keeps the set of root headers, one per classification. Structural work is
//! split across `resolve` (root lookup and path compression), `mutate` (the
//! group operations) and `compare` (partition equality and copying).

mod compare;
mod mutate;
mod resolve;

#[cfg(test)]
mod property;

use std::{
    borrow::Borrow,
    collections::{HashMap, HashSet, hash_map::RandomState},
    fmt,
    hash::{BuildHasher, Hash},
};

use tracing::error;

use crate::{
    config::PartitionConfig,
    error::{PartitionError, Result},
    forest::{Forest, HeaderId, NodeId},
    invariants::InvariantChecker,
};

/// Hierarchical union-find over keys of type `K`, carrying a `V` per key.
///
/// Each classification is a tree of headers whose root is the canonical
/// identity of the group. Lookups through `&mut self` compress the path from
/// a key's node to its root; lookups through `&self` walk without changing
/// the tree.
///
/// The type is reached through [`DisjointSet`](crate::DisjointSet) and
/// [`DisjointMap`](crate::DisjointMap), which dereference to it.
pub struct DisjointBase<K, V, S = RandomState> {
    forest: Forest<V>,
    keys: HashMap<K, NodeId, S>,
    roots: HashSet<HeaderId>,
    config: PartitionConfig,
}

impl<K, V, S> DisjointBase<K, V, S> {
    /// Returns the number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no key is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of classifications.
    #[must_use]
    pub fn classification(&self) -> usize {
        self.roots.len()
    }

    /// Iterates over every tracked key in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.keys()
    }

    /// Iterates over the root header of every classification.
    pub fn roots(&self) -> impl Iterator<Item = HeaderId> + '_ {
        self.roots.iter().copied()
    }

    /// Read-only view of the header/node forest.
    #[must_use]
    pub fn forest(&self) -> &Forest<V> {
        &self.forest
    }

    /// Settings this partition was created with.
    #[must_use]
    pub fn config(&self) -> PartitionConfig {
        self.config
    }

    /// Returns a checker that validates the structure of this partition.
    #[must_use]
    pub fn invariants(&self) -> InvariantChecker<'_, V> {
        InvariantChecker::new(&self.forest, &self.roots, self.keys.values().copied().collect())
    }

    /// Resolves `node` to its root header, compressing the path.
    ///
    /// # Errors
    /// Returns [`PartitionError::StaleNode`] when the handle is not live and
    /// [`PartitionError::DetachedNode`] when it has no header.
    pub fn root_of(&mut self, node: NodeId) -> Result<HeaderId> {
        self.attached(node)?;
        Ok(self.final_header(node))
    }

    /// Resolves `node` to its root header without changing the tree.
    ///
    /// # Errors
    /// Returns [`PartitionError::StaleNode`] when the handle is not live and
    /// [`PartitionError::DetachedNode`] when it has no header.
    pub fn root_of_const(&self, node: NodeId) -> Result<HeaderId> {
        self.attached(node)?;
        Ok(self.final_header_const(node))
    }

    /// Borrows the payload stored on `node`.
    ///
    /// # Errors
    /// Returns [`PartitionError::StaleNode`] when the handle is not live.
    pub fn value_of(&self, node: NodeId) -> Result<&V> {
        self.forest
            .node(node)
            .map(|entry| entry.value())
            .ok_or(PartitionError::StaleNode { node })
    }

    /// Number of keys beneath `header`.
    ///
    /// # Errors
    /// Returns [`PartitionError::StaleHeader`] when the handle is not live.
    pub fn group_len(&self, header: HeaderId) -> Result<usize> {
        self.forest
            .header(header)
            .map(|entry| entry.count())
            .ok_or(PartitionError::StaleHeader { header })
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys
            .iter()
            .map(|(key, &node)| (key, self.forest.node_at(node).value()))
    }

    pub(crate) fn value_at_mut(&mut self, node: NodeId) -> &mut V {
        &mut self.forest.node_at_mut(node).value
    }

    fn attached(&self, node: NodeId) -> Result<()> {
        let entry = self
            .forest
            .node(node)
            .ok_or(PartitionError::StaleNode { node })?;
        match entry.parent() {
            Some(_) => Ok(()),
            None => Err(PartitionError::DetachedNode { node }),
        }
    }

    /// Runs the full invariant sweep when the configuration asks for it.
    fn verify(&self, operation: &'static str) {
        if !self.config.verifies_mutations() {
            return;
        }
        if let Err(violation) = self.invariants().check_all() {
            error!(operation, %violation, "partition invariant violated");
            panic!("partition invariant violated after {operation}: {violation}");
        }
    }
}

impl<K, V, S> DisjointBase<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn with_config_and_hasher(config: PartitionConfig, hasher: S) -> Self {
        Self {
            forest: Forest::with_capacity(config.capacity()),
            keys: HashMap::with_capacity_and_hasher(config.capacity(), hasher),
            roots: HashSet::new(),
            config,
        }
    }

    /// Returns `true` when `key` is tracked.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.contains_key(key)
    }

    /// Handle of the node tracking `key`.
    #[must_use]
    pub fn node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.get(key).copied()
    }

    /// Size of the classification holding `key`, or zero when the key is
    /// not tracked.
    #[must_use]
    pub fn sibling_count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.root(key)
            .map_or(0, |root| self.forest.header_at(root).count())
    }

    /// Returns `true` when both keys are tracked and share a classification.
    #[must_use]
    pub fn is_sibling<Q>(&self, x: &Q, y: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match (self.node(x), self.node(y)) {
            (Some(a), Some(b)) => a == b || self.final_header_const(a) == self.final_header_const(b),
            _ => false,
        }
    }

    /// Root header of the classification holding `key`, compressing the path
    /// from the key's node.
    pub fn find<Q>(&mut self, key: &Q) -> Option<HeaderId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.node(key)?;
        Some(self.final_header(node))
    }

    /// Root header of the classification holding `key`, leaving the tree
    /// untouched.
    #[must_use]
    pub fn root<Q>(&self, key: &Q) -> Option<HeaderId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node(key).map(|node| self.final_header_const(node))
    }

    /// Every classification as a list of its keys.
    ///
    /// Neither the order of the groups nor the order within a group is
    /// meaningful.
    #[must_use]
    pub fn groups(&self) -> Vec<Vec<&K>> {
        self.grouped_entries()
            .into_iter()
            .map(|group| group.into_iter().map(|(key, _)| key).collect())
            .collect()
    }

    pub(crate) fn grouped_entries(&self) -> Vec<Vec<(&K, NodeId)>> {
        let mut buckets: HashMap<HeaderId, Vec<(&K, NodeId)>> =
            HashMap::with_capacity(self.roots.len());
        for (key, &node) in &self.keys {
            buckets
                .entry(self.final_header_const(node))
                .or_default()
                .push((key, node));
        }
        buckets.into_values().collect()
    }

    pub(crate) fn value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node(key).map(|node| self.forest.node_at(node).value())
    }

    pub(crate) fn value_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.node(key)?;
        self.forest.value_mut(node)
    }
}

impl<K, V, S> fmt::Debug for DisjointBase<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisjointBase")
            .field("len", &self.len())
            .field("classification", &self.classification())
            .field("groups", &self.groups())
            .finish()
    }
}
