//! Keyed disjoint-map facade: a partition whose keys each carry a value.

use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    ops::{Deref, DerefMut, Index},
};

use crate::{config::PartitionConfig, engine::DisjointBase, forest::NodeId};

/// Partition of keys into disjoint classifications, with a value per key.
///
/// Moving a key between classifications never touches its value. Group
/// operations and queries come from [`DisjointBase`], which this type
/// dereferences to.
///
/// # Examples
/// ```
/// use kindred_core::DisjointMap;
///
/// let mut digits: DisjointMap<u8, &str> = [
///     vec![(2, "two"), (4, "four")],
///     vec![(1, "one"), (3, "three")],
/// ]
/// .into_iter()
/// .collect();
/// assert!(digits.add_to(0, "ZERO", &2));
/// assert!(digits.update(&0, "zero"));
/// assert_eq!(digits[&0], "zero");
/// assert_eq!(digits.sibling_count(&4), 3);
/// ```
pub struct DisjointMap<K, V, S = RandomState> {
    base: DisjointBase<K, V, S>,
}

impl<K, V> DisjointMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PartitionConfig::default())
    }

    /// Creates an empty map with the given settings.
    #[must_use]
    pub fn with_config(config: PartitionConfig) -> Self {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S> DisjointMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty map that hashes keys with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(PartitionConfig::default(), hasher)
    }

    /// Creates an empty map with the given settings and hasher.
    #[must_use]
    pub fn with_config_and_hasher(config: PartitionConfig, hasher: S) -> Self {
        Self {
            base: DisjointBase::with_config_and_hasher(config, hasher),
        }
    }

    /// Adds `key` with `value` as a new singleton classification.
    ///
    /// Returns `false`, dropping `value`, when the key is already tracked.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.base.insert_root(key, value)
    }

    /// Adds `key` with `value` to the classification that holds `target`.
    ///
    /// Returns `false`, dropping `value`, when `key` is already tracked or
    /// `target` is not.
    pub fn add_to<Q>(&mut self, key: K, value: V, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.base.insert_under(key, value, target)
    }

    /// Replaces the value stored for `key`.
    ///
    /// Returns `false`, dropping `value`, when the key is not tracked.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.base.value_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Borrows the value stored for `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.base.value(key)
    }

    /// Mutably borrows the value stored for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.base.value_mut(key)
    }

    /// Returns the value for `key`, first adding the key as a new singleton
    /// classification holding `make()` when it is not tracked.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let node = match self.base.node(&key) {
            Some(node) => node,
            None => self.base.spawn_root(key, make()),
        };
        self.base.value_at_mut(node)
    }

    /// Stops tracking `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.base.take(key)
    }

    /// Iterates over every key and its value in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.base.entries()
    }

    /// Iterates over every value in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.base.entries().map(|(_, value)| value)
    }

    fn absorb_group(&mut self, group: impl IntoIterator<Item = (K, V)>) {
        let mut anchor: Option<NodeId> = None;
        for (key, value) in group {
            match anchor {
                Some(node) => {
                    self.base.attach_to_node(key, value, node);
                }
                None => {
                    anchor = Some(match self.base.node(&key) {
                        Some(existing) => existing,
                        None => self.base.spawn_root(key, value),
                    });
                }
            }
        }
    }
}

impl<K, V, S> Default for DisjointMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Deref for DisjointMap<K, V, S> {
    type Target = DisjointBase<K, V, S>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<K, V, S> DerefMut for DisjointMap<K, V, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl<K, V, S> Clone for DisjointMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<K, V, S> PartialEq for DisjointMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.base.same_partition_by(&other.base, |mine, theirs| mine == theirs)
    }
}

impl<K, V, S> Eq for DisjointMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for DisjointMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    /// Panics when `key` is not tracked.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key is not tracked by this DisjointMap")
    }
}

impl<K, V, S> fmt::Debug for DisjointMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = self.base.grouped_entries();
        f.debug_list()
            .entries(groups.iter().map(|group| GroupDebug {
                base: &self.base,
                members: group,
            }))
            .finish()
    }
}

struct GroupDebug<'a, K, V, S> {
    base: &'a DisjointBase<K, V, S>,
    members: &'a [(&'a K, NodeId)],
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for GroupDebug<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for &(key, node) in self.members {
            if let Ok(value) = self.base.value_of(node) {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Builds a map from groups of `(key, value)` pairs.
///
/// The first key of each group anchors it; when that key is already tracked
/// the rest of the group joins its existing classification and the anchor's
/// value is left alone. Keys already tracked elsewhere are skipped.
impl<K, V, S, G> FromIterator<G> for DisjointMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    G: IntoIterator<Item = (K, V)>,
{
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S, G> Extend<G> for DisjointMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
    G: IntoIterator<Item = (K, V)>,
{
    fn extend<I: IntoIterator<Item = G>>(&mut self, iter: I) {
        for group in iter {
            self.absorb_group(group);
        }
    }
}
