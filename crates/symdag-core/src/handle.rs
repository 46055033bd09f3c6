//! Node identifiers.
//!
//! Ids are 32-bit values handed out by a per-DAG counter. The counter is
//! never reset, so an id from before a `clear()` never aliases a newer node.

use std::fmt;

/// Identifies one node of an [`ExprDag`](crate::ExprDag).
///
/// Within one DAG, two ids are equal if and only if they name the same
/// (structurally unique) sub-expression, thanks to hash-consing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw value of this id.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}
