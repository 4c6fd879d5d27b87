//! Kindred core library: a hierarchical disjoint-set engine.
//!
//! Keys are partitioned into classifications, each backed by a tree of
//! headers in an arena [`Forest`]. Besides the classic union and find, the
//! engine deletes single keys, whole classifications or everything but one
//! key, and relocates single keys between classifications.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod engine;
mod error;
mod forest;
mod invariants;
mod map;
mod set;
mod telemetry;

#[cfg(test)]
mod test_utils;

pub use crate::{
    config::{PartitionConfig, Verification},
    engine::DisjointBase,
    error::{PartitionError, PartitionErrorCode, Result},
    forest::{Descendants, Forest, Header, HeaderId, HeaderIter, Node, NodeId, NodeIter},
    invariants::{Invariant, InvariantChecker, InvariantViolation, ListDefect},
    map::DisjointMap,
    set::DisjointSet,
};
