//! Core types for the Spall solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the strongly-typed entity ids, the error taxonomy shared by every
//! subsystem, and the double-buffered state containers on which the
//! step-synchronous update scheme is built.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod state;

pub use error::{CohesiveError, EosError, MeshError, SolveError, StepError, TransitionError};
pub use id::{CellId, DiscontinuityId, NodeId, Partition};
pub use state::{StateField, StatePair};
