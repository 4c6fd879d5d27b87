//! Keyed disjoint-set facade.

use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    ops::{Deref, DerefMut},
};

use crate::{config::PartitionConfig, engine::DisjointBase, forest::NodeId};

/// Partition of keys into disjoint classifications.
///
/// Group operations (`merge`, `join`, `join_to`, `del`, `del_all`,
/// `del_except`) and queries (`is_sibling`, `sibling_count`,
/// `classification`) come from [`DisjointBase`], which this type
/// dereferences to.
///
/// # Examples
/// ```
/// use kindred_core::DisjointSet;
///
/// let mut allies: DisjointSet<&str> = [vec!["eng", "fra"], vec!["usa"]]
///     .into_iter()
///     .collect();
/// assert_eq!(allies.classification(), 2);
/// assert!(allies.merge("usa", "eng"));
/// assert!(allies.is_sibling("usa", "fra"));
/// assert_eq!(allies.sibling_count("fra"), 3);
/// ```
pub struct DisjointSet<K, S = RandomState> {
    base: DisjointBase<K, (), S>,
}

impl<K> DisjointSet<K>
where
    K: Eq + Hash,
{
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PartitionConfig::default())
    }

    /// Creates an empty set with the given settings.
    #[must_use]
    pub fn with_config(config: PartitionConfig) -> Self {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, S> DisjointSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty set that hashes keys with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(PartitionConfig::default(), hasher)
    }

    /// Creates an empty set with the given settings and hasher.
    #[must_use]
    pub fn with_config_and_hasher(config: PartitionConfig, hasher: S) -> Self {
        Self {
            base: DisjointBase::with_config_and_hasher(config, hasher),
        }
    }

    /// Adds `key` as a new singleton classification.
    ///
    /// Returns `false` when the key is already tracked.
    pub fn add(&mut self, key: K) -> bool {
        self.base.insert_root(key, ())
    }

    /// Adds `key` to the classification that holds `target`.
    ///
    /// Returns `false` when `key` is already tracked or `target` is not.
    pub fn add_to<Q>(&mut self, key: K, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.base.insert_under(key, (), target)
    }

    fn absorb_group(&mut self, group: impl IntoIterator<Item = K>) {
        let mut anchor: Option<NodeId> = None;
        for key in group {
            match anchor {
                Some(node) => {
                    self.base.attach_to_node(key, (), node);
                }
                None => {
                    anchor = Some(match self.base.node(&key) {
                        Some(existing) => existing,
                        None => self.base.spawn_root(key, ()),
                    });
                }
            }
        }
    }
}

impl<K, S> Default for DisjointSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> Deref for DisjointSet<K, S> {
    type Target = DisjointBase<K, (), S>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<K, S> DerefMut for DisjointSet<K, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl<K, S> Clone for DisjointSet<K, S>
where
    K: Clone + Eq + Hash,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<K, S> PartialEq for DisjointSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.base.same_partition_by(&other.base, |_, _| true)
    }
}

impl<K, S> Eq for DisjointSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S> fmt::Debug for DisjointSet<K, S>
where
    K: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.base.groups().into_iter().map(GroupDebug))
            .finish()
    }
}

struct GroupDebug<'a, K>(Vec<&'a K>);

impl<K: fmt::Debug> fmt::Debug for GroupDebug<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.0).finish()
    }
}

/// Builds a set from groups of keys.
///
/// The first key of each group anchors it; when that key is already tracked
/// the rest of the group joins its existing classification. Keys already
/// tracked elsewhere are skipped.
impl<K, S, G> FromIterator<G> for DisjointSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    G: IntoIterator<Item = K>,
{
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<K, S, G> Extend<G> for DisjointSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
    G: IntoIterator<Item = K>,
{
    fn extend<I: IntoIterator<Item = G>>(&mut self, iter: I) {
        for group in iter {
            self.absorb_group(group);
        }
    }
}
