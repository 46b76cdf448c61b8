//! Mesh topology and field storage for the Spall solver.
//!
//! A 1D rod of `n` cells has `n + 1` nodes; cell `i` is bounded by nodes
//! `i` and `i + 1`. [`Topology1D`] answers the static adjacency queries,
//! [`NodeStore`] and [`CellStore`] hold the per-entity state as whole
//! arrays with current/new time levels, and [`SubcellFields`] carries the
//! right-hand sub-partition of enriched cells (the base arrays carry the
//! left sub-partition while a cell is enriched).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod node;
pub mod topology;

pub use cell::{CellInit, CellStore, SubcellFields};
pub use node::NodeStore;
pub use topology::Topology1D;
