//! Counter recorders compiled in with the `metrics` feature.
//!
//! Without the feature every recorder is an empty function the optimiser
//! removes, so call sites never need their own `cfg` guards.

#[cfg(feature = "metrics")]
pub(crate) fn record_compression() {
    metrics::counter!("kindred_path_compressions").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_compression() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_pruned(headers: usize) {
    if headers > 0 {
        metrics::counter!("kindred_headers_pruned").increment(headers as u64);
    }
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_pruned(_headers: usize) {}

#[cfg(feature = "metrics")]
pub(crate) fn record_merge() {
    metrics::counter!("kindred_groups_merged").increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_merge() {}

#[cfg(feature = "metrics")]
pub(crate) fn record_deleted(keys: usize) {
    if keys > 0 {
        metrics::counter!("kindred_keys_deleted").increment(keys as u64);
    }
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_deleted(_keys: usize) {}
