//! Structural invariant checks for a partition.
//!
//! The checkers are surfaced via [`DisjointBase::invariants`] so tests (and
//! [`Verification::AfterMutation`]) can assert forest health after each
//! operation without reimplementing the traversal logic. No check mutates
//! state, and every list walk is bounded by the arena size so corrupted links
//! surface as violations instead of hanging.
//!
//! [`DisjointBase::invariants`]: crate::DisjointBase::invariants
//! [`Verification::AfterMutation`]: crate::Verification::AfterMutation

mod counts;
mod helpers;
mod linkage;
mod reachability;
mod roots;

use std::{collections::HashSet, fmt};

use thiserror::Error;
use tracing::debug;

use crate::forest::{Forest, HeaderId, NodeId};

use self::{
    counts::check_subtree_counts,
    linkage::{check_header_links, check_node_links},
    reachability::check_reachability,
    roots::{check_membership, check_root_registry},
};

/// Enumerates the structural invariants of a partition.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Invariant {
    /// Every header's node list is a consistent doubly linked list whose
    /// members point back at the header.
    NodeLinks,
    /// Every header's child-header list is a consistent doubly linked list
    /// whose members point back at the header.
    HeaderLinks,
    /// Every header counts exactly the nodes beneath it, and no emptied
    /// non-root header survives.
    SubtreeCounts,
    /// The root registry holds live, parentless, non-empty headers whose
    /// counts add up to the number of tracked keys.
    RootRegistry,
    /// Every tracked key's node is live, attached and resolves to a
    /// registered root.
    Membership,
    /// Every live header and node is reachable from a registered root, and
    /// every reachable node is tracked by a key.
    Reachability,
}

impl Invariant {
    /// Returns all invariants in the order they should be evaluated.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::NodeLinks,
            Self::HeaderLinks,
            Self::SubtreeCounts,
            Self::RootRegistry,
            Self::Membership,
            Self::Reachability,
        ]
    }
}

/// Describes how an intrusive list failed validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListDefect<I> {
    /// Exactly one of the head and tail links is set.
    OneSidedEnds,
    /// The list links to a slot that is not live.
    Dangling {
        /// Handle found in the list.
        element: I,
    },
    /// An element's `left` link does not name its predecessor.
    BackLink {
        /// Element whose back link is wrong.
        element: I,
    },
    /// The walk visited more elements than the arena holds.
    Cycle,
    /// The recorded tail differs from the last element reached.
    TailMismatch {
        /// Tail stored on the owning header.
        recorded: Option<I>,
        /// Last element reached by following `right` links.
        walked: Option<I>,
    },
}

impl<I: fmt::Display> fmt::Display for ListDefect<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneSidedEnds => f.write_str("only one of head and tail is set"),
            Self::Dangling { element } => write!(f, "links to dead slot {element}"),
            Self::BackLink { element } => {
                write!(f, "{element} does not link back to its predecessor")
            }
            Self::Cycle => f.write_str("forward links form a cycle"),
            Self::TailMismatch { recorded, walked } => write!(
                f,
                "recorded tail {} but the walk ended at {}",
                DisplayOption(recorded),
                DisplayOption(walked)
            ),
        }
    }
}

struct DisplayOption<'a, I>(&'a Option<I>);

impl<I: fmt::Display> fmt::Display for DisplayOption<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("nothing"),
        }
    }
}

/// Reports an invariant violation surfaced by [`InvariantChecker`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvariantViolation {
    /// A header's node list is malformed.
    #[error("node list of {header}: {defect}")]
    NodeList {
        /// Header owning the list.
        header: HeaderId,
        /// What went wrong.
        defect: ListDefect<NodeId>,
    },
    /// A node sits in a header's list but names another parent.
    #[error("node {node} is listed under {header} but records parent {}", DisplayOption(.recorded))]
    NodeParent {
        /// Header whose list holds the node.
        header: HeaderId,
        /// Offending node.
        node: NodeId,
        /// Parent stored on the node.
        recorded: Option<HeaderId>,
    },
    /// A header's child-header list is malformed.
    #[error("header list of {header}: {defect}")]
    HeaderList {
        /// Header owning the list.
        header: HeaderId,
        /// What went wrong.
        defect: ListDefect<HeaderId>,
    },
    /// A header sits in another header's child list but names another
    /// parent.
    #[error("header {child} is listed under {header} but records parent {}", DisplayOption(.recorded))]
    HeaderParent {
        /// Header whose list holds the child.
        header: HeaderId,
        /// Offending child header.
        child: HeaderId,
        /// Parent stored on the child.
        recorded: Option<HeaderId>,
    },
    /// A header's count disagrees with the nodes beneath it.
    #[error("header {header} records {recorded} node(s) but holds {expected}")]
    SubtreeCount {
        /// Header with the wrong count.
        header: HeaderId,
        /// Count stored on the header.
        recorded: usize,
        /// Count derived from its lists.
        expected: usize,
    },
    /// A non-root header is empty but was never pruned.
    #[error("non-root header {header} is empty")]
    UnprunedHeader {
        /// Empty header.
        header: HeaderId,
    },
    /// The root registry names a dead slot.
    #[error("registered root {header} is not live")]
    StaleRoot {
        /// Registered handle.
        header: HeaderId,
    },
    /// The root registry names a header that has a parent.
    #[error("registered root {header} has parent {parent}")]
    NestedRoot {
        /// Registered handle.
        header: HeaderId,
        /// Parent stored on the header.
        parent: HeaderId,
    },
    /// The root registry names a header with no nodes beneath it.
    #[error("registered root {header} is empty")]
    EmptyRoot {
        /// Registered handle.
        header: HeaderId,
    },
    /// Root counts do not add up to the number of tracked keys.
    #[error("root counts add up to {roots_total} but {keys} key(s) are tracked")]
    TotalCount {
        /// Sum of the counts of live registered roots.
        roots_total: usize,
        /// Number of tracked keys.
        keys: usize,
    },
    /// A tracked key maps to a dead node slot.
    #[error("tracked node {node} is not live")]
    StaleMember {
        /// Node stored for the key.
        node: NodeId,
    },
    /// A tracked key maps to a node without a header.
    #[error("tracked node {node} is not attached to a header")]
    DetachedMember {
        /// Node stored for the key.
        node: NodeId,
    },
    /// Walking up from a node reaches a dead header.
    #[error("ancestors of node {node} include dead header {header}")]
    DeadAncestor {
        /// Node whose ancestry is broken.
        node: NodeId,
        /// First dead header on the way up.
        header: HeaderId,
    },
    /// Walking up from a node never reaches a root.
    #[error("parent links above node {node} form a cycle")]
    ParentCycle {
        /// Node whose ancestry loops.
        node: NodeId,
    },
    /// A tracked node resolves to a root missing from the registry.
    #[error("node {node} resolves to unregistered root {root}")]
    UnregisteredRoot {
        /// Node stored for the key.
        node: NodeId,
        /// Root reached from the node.
        root: HeaderId,
    },
    /// A live header cannot be reached from any registered root.
    #[error("header {header} is live but unreachable")]
    LeakedHeader {
        /// Unreachable header.
        header: HeaderId,
    },
    /// A live node cannot be reached from any registered root.
    #[error("node {node} is live but unreachable")]
    LeakedNode {
        /// Unreachable node.
        node: NodeId,
    },
    /// A reachable node is not tracked by any key.
    #[error("node {node} is reachable but no key tracks it")]
    UnkeyedNode {
        /// Untracked node.
        node: NodeId,
    },
}

impl InvariantViolation {
    /// Returns the invariant this violation breaks.
    #[must_use]
    pub const fn invariant(&self) -> Invariant {
        match self {
            Self::NodeList { .. } | Self::NodeParent { .. } => Invariant::NodeLinks,
            Self::HeaderList { .. } | Self::HeaderParent { .. } => Invariant::HeaderLinks,
            Self::SubtreeCount { .. } | Self::UnprunedHeader { .. } => Invariant::SubtreeCounts,
            Self::StaleRoot { .. }
            | Self::NestedRoot { .. }
            | Self::EmptyRoot { .. }
            | Self::TotalCount { .. } => Invariant::RootRegistry,
            Self::StaleMember { .. }
            | Self::DetachedMember { .. }
            | Self::DeadAncestor { .. }
            | Self::ParentCycle { .. }
            | Self::UnregisteredRoot { .. } => Invariant::Membership,
            Self::LeakedHeader { .. } | Self::LeakedNode { .. } | Self::UnkeyedNode { .. } => {
                Invariant::Reachability
            }
        }
    }
}

/// Helper returned by [`DisjointBase::invariants`] to run structural checks.
///
/// [`DisjointBase::invariants`]: crate::DisjointBase::invariants
pub struct InvariantChecker<'a, V> {
    forest: &'a Forest<V>,
    roots: &'a HashSet<HeaderId>,
    members: Vec<NodeId>,
}

impl<V> fmt::Debug for InvariantChecker<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvariantChecker")
            .field("forest", self.forest)
            .field("roots", &self.roots.len())
            .field("members", &self.members.len())
            .finish()
    }
}

impl<'a, V> InvariantChecker<'a, V> {
    pub(crate) fn new(
        forest: &'a Forest<V>,
        roots: &'a HashSet<HeaderId>,
        members: Vec<NodeId>,
    ) -> Self {
        Self {
            forest,
            roots,
            members,
        }
    }

    /// Runs all invariants, returning the first violation encountered.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_all(&self) -> Result<(), InvariantViolation> {
        self.check_many(Invariant::all())
    }

    /// Runs a custom subset of invariants in the provided order.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = Invariant>,
    ) -> Result<(), InvariantViolation> {
        self.run_with_mode(invariants, EvaluationMode::FailFast)
    }

    /// Runs a single invariant.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn check(&self, invariant: Invariant) -> Result<(), InvariantViolation> {
        self.check_many([invariant])
    }

    /// Runs the node-list invariant directly.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn node_links(&self) -> Result<(), InvariantViolation> {
        self.check(Invariant::NodeLinks)
    }

    /// Runs the header-list invariant directly.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn header_links(&self) -> Result<(), InvariantViolation> {
        self.check(Invariant::HeaderLinks)
    }

    /// Runs the subtree-count invariant directly.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn subtree_counts(&self) -> Result<(), InvariantViolation> {
        self.check(Invariant::SubtreeCounts)
    }

    /// Runs the root-registry invariant directly.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn root_registry(&self) -> Result<(), InvariantViolation> {
        self.check(Invariant::RootRegistry)
    }

    /// Runs the membership invariant directly.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn membership(&self) -> Result<(), InvariantViolation> {
        self.check(Invariant::Membership)
    }

    /// Runs the reachability invariant directly.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn reachability(&self) -> Result<(), InvariantViolation> {
        self.check(Invariant::Reachability)
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<InvariantViolation> {
        self.collect_many(Invariant::all())
    }

    /// Executes the selected invariants and returns every violation
    /// discovered.
    #[must_use]
    pub fn collect_many(
        &self,
        invariants: impl IntoIterator<Item = Invariant>,
    ) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let _ = self.run_with_mode(invariants, EvaluationMode::Collect(&mut violations));
        violations
    }

    fn run_with_mode(
        &self,
        invariants: impl IntoIterator<Item = Invariant>,
        mut mode: EvaluationMode<'_>,
    ) -> Result<(), InvariantViolation> {
        let ctx = PartitionContext {
            forest: self.forest,
            roots: self.roots,
            members: &self.members,
        };
        for invariant in invariants {
            dispatch(ctx, invariant, &mut mode)?;
        }
        Ok(())
    }
}

fn dispatch<V>(
    ctx: PartitionContext<'_, V>,
    invariant: Invariant,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), InvariantViolation> {
    match invariant {
        Invariant::NodeLinks => check_node_links(ctx, mode),
        Invariant::HeaderLinks => check_header_links(ctx, mode),
        Invariant::SubtreeCounts => check_subtree_counts(ctx, mode),
        Invariant::RootRegistry => check_root_registry(ctx, mode),
        Invariant::Membership => check_membership(ctx, mode),
        Invariant::Reachability => check_reachability(ctx, mode),
    }
}

pub(super) struct PartitionContext<'a, V> {
    forest: &'a Forest<V>,
    roots: &'a HashSet<HeaderId>,
    members: &'a [NodeId],
}

impl<V> Clone for PartitionContext<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for PartitionContext<'_, V> {}

pub(super) enum EvaluationMode<'a> {
    FailFast,
    Collect(&'a mut Vec<InvariantViolation>),
}

impl EvaluationMode<'_> {
    fn record(&mut self, violation: InvariantViolation) -> Result<(), InvariantViolation> {
        debug!(invariant = ?violation.invariant(), %violation, "invariant violation");
        match self {
            Self::FailFast => Err(violation),
            Self::Collect(sink) => {
                sink.push(violation);
                Ok(())
            }
        }
    }
}
