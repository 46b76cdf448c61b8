//! Strongly-typed identifiers for mesh entities and discontinuities.

use std::fmt;

/// Identifies a cell within the mesh.
///
/// Cells are created once at mesh build time and assigned sequential IDs.
/// `CellId(n)` is the n-th cell from the left end of the rod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// The id as a `usize` index into whole-mesh arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a node within the mesh.
///
/// Nodes are created once at mesh build time; `NodeId(n)` is the n-th
/// node from the left end, so cell `i` is bounded by nodes `i` and `i+1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id as a `usize` index into whole-mesh arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Stable handle for a registered discontinuity.
///
/// Allocated from a monotonic per-registry counter and never reused, so
/// removing one discontinuity can never re-key another. Holding a stale
/// handle after de-enrichment is safe: lookups simply return `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscontinuityId(pub u64);

impl fmt::Display for DiscontinuityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which part of a cell a value or an error refers to.
///
/// Classical cells have a single `Whole` partition. Enriched cells evolve
/// a `Left` and a `Right` sub-partition independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    /// The single partition of a classical cell.
    Whole,
    /// The left sub-partition of an enriched cell.
    Left,
    /// The right sub-partition of an enriched cell.
    Right,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => write!(f, "whole"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}
