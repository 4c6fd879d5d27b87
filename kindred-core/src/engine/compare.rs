//! Shape-independent equality and compacting copies.

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

use crate::forest::HeaderId;

use super::DisjointBase;

impl<K, V, S> DisjointBase<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Returns `true` when `other` groups exactly the same keys together,
    /// whatever the shape of either header tree, and `same_value` accepts
    /// every pair of payloads stored under the same key.
    ///
    /// The first key seen in each local classification becomes its delegate:
    /// every later key of that classification must land in the same foreign
    /// classification as the delegate did, and sizes must agree key by key.
    pub(crate) fn same_partition_by<W, T>(
        &self,
        other: &DisjointBase<K, W, T>,
        mut same_value: impl FnMut(&V, &W) -> bool,
    ) -> bool
    where
        T: BuildHasher,
    {
        if self.len() != other.len() || self.classification() != other.classification() {
            return false;
        }
        let mut delegates: HashMap<HeaderId, HeaderId> =
            HashMap::with_capacity(self.classification());
        for (key, &node) in &self.keys {
            let Some(&theirs) = other.keys.get(key) else {
                return false;
            };
            let root = self.final_header_const(node);
            let their_root = other.final_header_const(theirs);
            if self.forest.header_at(root).count() != other.forest.header_at(their_root).count() {
                return false;
            }
            if *delegates.entry(root).or_insert(their_root) != their_root {
                return false;
            }
            if !same_value(
                self.forest.node_at(node).value(),
                other.forest.node_at(theirs).value(),
            ) {
                return false;
            }
        }
        true
    }
}

impl<K, V, S> Clone for DisjointBase<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Rebuilds the partition with one header per classification.
    fn clone(&self) -> Self {
        let config = self.config.with_capacity(self.len().max(self.config.capacity()));
        let mut copy = Self::with_config_and_hasher(config, self.keys.hasher().clone());
        let mut mapped: HashMap<HeaderId, HeaderId> = HashMap::with_capacity(self.roots.len());
        for (key, &node) in &self.keys {
            let source = self.final_header_const(node);
            let target = *mapped
                .entry(source)
                .or_insert_with(|| copy.forest.alloc_header());
            let fresh = copy.forest.alloc_node(self.forest.node_at(node).value().clone());
            copy.forest.append_node(target, fresh);
            copy.keys.insert(key.clone(), fresh);
        }
        copy.roots.extend(mapped.into_values());
        copy.config = self.config;
        copy
    }
}
