//! Shared test utilities for `kindred-core`.

use kindred_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{DisjointMap, DisjointSet, PartitionConfig, Verification};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROPTEST_CASES` and
/// `KINDRED_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Settings that re-run the invariant checker after every mutation.
#[must_use]
pub(crate) fn verifying() -> PartitionConfig {
    PartitionConfig::default().with_verification(Verification::AfterMutation)
}

/// Builds a verifying set from groups of keys.
pub(crate) fn verifying_set<K, G>(groups: impl IntoIterator<Item = G>) -> DisjointSet<K>
where
    K: Eq + std::hash::Hash,
    G: IntoIterator<Item = K>,
{
    let mut set = DisjointSet::with_config(verifying());
    set.extend(groups);
    set
}

/// Builds a verifying map from groups of `(key, value)` pairs.
pub(crate) fn verifying_map<K, V, G>(groups: impl IntoIterator<Item = G>) -> DisjointMap<K, V>
where
    K: Eq + std::hash::Hash,
    G: IntoIterator<Item = (K, V)>,
{
    let mut map = DisjointMap::with_config(verifying());
    map.extend(groups);
    map
}

/// Sorted groups of a set, for order-independent assertions.
pub(crate) fn sorted_groups<K: Ord + Clone + Eq + std::hash::Hash>(
    set: &DisjointSet<K>,
) -> Vec<Vec<K>> {
    let mut groups: Vec<Vec<K>> = set
        .groups()
        .into_iter()
        .map(|group| {
            let mut keys: Vec<K> = group.into_iter().cloned().collect();
            keys.sort();
            keys
        })
        .collect();
    groups.sort();
    groups
}
