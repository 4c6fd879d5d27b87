//! Benchmark support crate for kindred.
//!
//! Builds deterministic partitions shaped to stress the two costly paths of
//! the engine: resolving keys through deep header chains, and tearing down
//! whole classifications.

pub mod error;
pub mod params;
pub mod workload;
