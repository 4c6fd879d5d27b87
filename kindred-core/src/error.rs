//! Error types for the kindred core library.
//!
//! Routine misses (absent keys, redundant unions) are reported as `bool` by
//! the keyed API. The handle-level API reports stale or detached handles with
//! [`PartitionError`], which carries a stable machine-readable code.

use std::fmt;

use thiserror::Error;

use crate::forest::{HeaderId, NodeId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error returned when a node or header handle does not name a usable slot.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PartitionError {
    /// The node handle refers to a slot that is free or was never allocated.
    #[error("node {node} is not live in this partition")]
    StaleNode {
        /// The rejected node handle.
        node: NodeId,
    },
    /// The header handle refers to a slot that is free or was never allocated.
    #[error("header {header} is not live in this partition")]
    StaleHeader {
        /// The rejected header handle.
        header: HeaderId,
    },
    /// The node is live but not attached to any header.
    ///
    /// Keyed operations only leave a node detached inside a single call, so
    /// this reports a corrupted forest rather than a caller mistake.
    #[error("node {node} is not attached to a header")]
    DetachedNode {
        /// The detached node handle.
        node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`PartitionError`] variants.
    enum PartitionErrorCode for PartitionError {
        /// The node handle refers to a slot that is free or was never allocated.
        StaleNode => StaleNode { .. } => "PARTITION_STALE_NODE",
        /// The header handle refers to a slot that is free or was never allocated.
        StaleHeader => StaleHeader { .. } => "PARTITION_STALE_HEADER",
        /// The node is live but not attached to any header; signals corruption.
        DetachedNode => DetachedNode { .. } => "PARTITION_DETACHED_NODE",
    }
}

/// Convenient alias for results returned by the handle-level API.
pub type Result<T> = core::result::Result<T, PartitionError>;
