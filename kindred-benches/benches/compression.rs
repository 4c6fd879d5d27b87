//! Path compression benchmarks.
//!
//! Measures resolving every key of a classification whose headers form a
//! single chain. The first lookups walk the full chain and flatten it, so the
//! timing covers both the walk and the pruning of emptied headers.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};

use kindred_benches::{
    error::BenchSetupError,
    params::ChainParams,
    workload::{ChainWorkload, nested_chain, resolve_all},
};

/// Seed for the probe order.
const SEED: u64 = 42;

/// Chain depths to benchmark.
const DEPTHS: &[usize] = &[100, 1_000, 10_000];

fn build_chain(params: &ChainParams) -> ChainWorkload {
    match nested_chain(params) {
        Ok(workload) => workload,
        Err(err) => panic!("nested chain setup failed for {params}: {err}"),
    }
}

fn find_on_nested_chain_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("find_on_nested_chain");
    group.sample_size(20);

    for &key_count in DEPTHS {
        let params = ChainParams {
            key_count,
            seed: SEED,
        };
        // Reject bad parameters before sampling starts.
        nested_chain(&params)?;

        group.bench_with_input(
            BenchmarkId::from_parameter(&params),
            &params,
            |b, params| {
                b.iter_batched(
                    || build_chain(params),
                    |ChainWorkload { mut set, probes }| resolve_all(&mut set, &probes),
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
    Ok(())
}

fn find_on_nested_chain(c: &mut Criterion) {
    if let Err(err) = find_on_nested_chain_impl(c) {
        panic!("find_on_nested_chain benchmark setup failed: {err}");
    }
}

criterion_group!(benches, find_on_nested_chain);
criterion_main!(benches);
