//! Deterministic partitions for the benchmarks.
//!
//! Every builder validates its parameters and checks the finished partition
//! against the structural invariants before handing it out, so a benchmark
//! never times a malformed forest.

use std::ops::Range;

use kindred_core::{DisjointSet, PartitionConfig};
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{
    error::BenchSetupError,
    params::{ChainParams, TeardownParams},
};

/// A single classification whose headers form one long chain.
#[derive(Debug)]
pub struct ChainWorkload {
    /// The partition under test.
    pub set: DisjointSet<u32>,
    /// Every key, in shuffled resolution order.
    pub probes: Vec<u32>,
}

/// Many classifications of equal size, one of which is torn down.
#[derive(Debug)]
pub struct TeardownWorkload {
    /// The partition under test.
    pub set: DisjointSet<u32>,
    /// A key in the last classification built.
    pub victim: u32,
}

fn key_range(count: usize, context: &'static str) -> Result<Range<u32>, BenchSetupError> {
    if count == 0 {
        return Err(BenchSetupError::ZeroValue { context });
    }
    let end = u32::try_from(count).map_err(|_| BenchSetupError::TooManyKeys {
        requested: count,
        limit: usize::try_from(u32::MAX).unwrap_or(usize::MAX),
    })?;
    Ok(0..end)
}

/// Builds a classification in which key `0` sits `key_count` headers below
/// the root.
///
/// Each new key becomes a fresh root and absorbs the chain built so far, so
/// the first lookup of an old key walks the whole chain.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] for an empty chain,
/// [`BenchSetupError::TooManyKeys`] when the keys do not fit in `u32`, and
/// [`BenchSetupError::Malformed`] if the result fails its invariant checks.
pub fn nested_chain(params: &ChainParams) -> Result<ChainWorkload, BenchSetupError> {
    let keys = key_range(params.key_count, "ChainParams::key_count")?;
    let mut set = DisjointSet::new();
    for key in keys.clone() {
        set.add(key);
        if let Some(previous) = key.checked_sub(1) {
            set.merge(&key, &previous);
        }
    }
    set.invariants().check_all()?;

    let mut probes: Vec<u32> = keys.collect();
    probes.shuffle(&mut SmallRng::seed_from_u64(params.seed));
    Ok(ChainWorkload { set, probes })
}

/// Resolves every probe and returns how many were tracked.
pub fn resolve_all(set: &mut DisjointSet<u32>, probes: &[u32]) -> usize {
    probes
        .iter()
        .filter(|&key| set.find(key).is_some())
        .count()
}

/// Builds `group_count` classifications of `group_size` keys each.
///
/// Every key after the first in a classification arrives as a singleton and
/// is merged beneath the first, leaving one child header per key.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when either dimension is zero,
/// [`BenchSetupError::TooManyKeys`] when the keys do not fit in `u32`, and
/// [`BenchSetupError::Malformed`] if the result fails its invariant checks.
pub fn grouped(params: &TeardownParams) -> Result<TeardownWorkload, BenchSetupError> {
    if params.group_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "TeardownParams::group_count",
        });
    }
    let mut keys = key_range(params.group_size, "TeardownParams::group_size")
        .and_then(|_| key_range(params.key_count(), "TeardownParams::key_count"))?;
    let mut set =
        DisjointSet::with_config(PartitionConfig::default().with_capacity(params.key_count()));
    let mut victim = 0;

    while let Some(first) = keys.next() {
        set.add(first);
        victim = first;
        for key in keys.by_ref().take(params.group_size.saturating_sub(1)) {
            set.add(key);
            set.merge(&first, &key);
            victim = key;
        }
    }
    set.invariants().check_all()?;
    Ok(TeardownWorkload { set, victim })
}

#[cfg(test)]
mod tests {
    //! Shape checks for the generated workloads.

    use rstest::rstest;

    use super::{
        BenchSetupError, ChainParams, ChainWorkload, TeardownParams, TeardownWorkload, grouped,
        nested_chain, resolve_all,
    };

    #[rstest]
    #[case::single(1)]
    #[case::short(8)]
    #[case::deep(200)]
    fn chain_depth_matches_key_count(#[case] key_count: usize) -> Result<(), BenchSetupError> {
        let ChainWorkload { mut set, probes } = nested_chain(&ChainParams { key_count, seed: 7 })?;
        let deepest = set.node(&0).and_then(|node| set.forest().depth_of(node));
        assert_eq!(deepest, Some(key_count));
        assert_eq!(set.classification(), 1);
        assert_eq!(probes.len(), key_count);

        assert_eq!(resolve_all(&mut set, &probes), key_count);
        let flattened = set.node(&0).and_then(|node| set.forest().depth_of(node));
        assert_eq!(flattened, Some(1));
        Ok(())
    }

    #[rstest]
    fn same_seed_gives_same_probe_order() -> Result<(), BenchSetupError> {
        let params = ChainParams { key_count: 64, seed: 3 };
        let first = nested_chain(&params)?;
        let second = nested_chain(&params)?;
        assert_eq!(first.probes, second.probes);
        Ok(())
    }

    #[rstest]
    #[case::empty_chain(nested_chain(&ChainParams { key_count: 0, seed: 1 }).map(|_| ()))]
    #[case::no_groups(grouped(&TeardownParams { group_count: 0, group_size: 4 }).map(|_| ()))]
    #[case::empty_groups(grouped(&TeardownParams { group_count: 4, group_size: 0 }).map(|_| ()))]
    fn zero_parameters_are_rejected(#[case] outcome: Result<(), BenchSetupError>) {
        assert!(matches!(outcome, Err(BenchSetupError::ZeroValue { .. })));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 1)]
    #[case(4, 16)]
    fn grouped_builds_equal_classifications(
        #[case] group_count: usize,
        #[case] group_size: usize,
    ) -> Result<(), BenchSetupError> {
        let params = TeardownParams {
            group_count,
            group_size,
        };
        let TeardownWorkload { mut set, victim } = grouped(&params)?;
        assert_eq!(set.len(), params.key_count());
        assert_eq!(set.classification(), group_count);
        assert_eq!(set.sibling_count(&victim), group_size);

        assert!(set.del_all(&victim));
        assert_eq!(set.len(), params.key_count() - group_size);
        assert_eq!(set.classification(), group_count - 1);
        assert!(set.invariants().check_all().is_ok());
        Ok(())
    }
}
