//! Errors returned by [`OrderedMap`][crate::OrderedMap] and [`List`][crate::List].

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The ways an operation on one of this crate's containers can fail. Every variant is a local,
/// recoverable condition: the container is left exactly as it was before the failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// A minimum or maximum was requested from a map with no entries.
    #[error("the tree is empty")]
    EmptyTree,

    /// The key passed to a "must exist" operation isn't in the map.
    #[error("key not found")]
    NotFound,

    /// A [`NodeId`][crate::NodeId] that doesn't refer to a live node of this container, usually
    /// because the node has since been removed.
    #[error("handle does not refer to a live node")]
    InvalidPosition,

    /// [`OrderedMap::try_insert`][crate::OrderedMap::try_insert] was given a key that is already
    /// present.
    #[error("key is already present")]
    DuplicateKey,
}

/// A broken structural invariant, as reported by
/// [`OrderedMap::check_invariants`][crate::OrderedMap::check_invariants].
///
/// None of these can be produced through the public API. They exist so tests can assert that
/// the relinking done by deletion left a well-formed tree behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A node's key is not strictly between the bounds imposed by its ancestors.
    #[error("node at slot {index} breaks the search order")]
    Order {
        /// Arena slot of the offending node.
        index: usize,
    },

    /// A node's parent link doesn't point at the node that owns it, or the root has a parent.
    #[error("node at slot {index} has an inconsistent parent link")]
    Parent {
        /// Arena slot of the offending node.
        index: usize,
    },

    /// Walking the tree visited more nodes than the map claims to hold.
    #[error("tree walk did not terminate within {count} nodes")]
    Cycle {
        /// The node count the walk was bounded by.
        count: usize,
    },

    /// The tracked node count disagrees with what is actually reachable or allocated.
    #[error("count is {count} but {reachable} nodes are reachable and {allocated} allocated")]
    Count {
        /// The tracked count.
        count: usize,
        /// Nodes reachable from the root.
        reachable: usize,
        /// Live slots in the arena.
        allocated: usize,
    },
}
