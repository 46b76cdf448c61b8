//! Error types for the Spall solver.
//!
//! One enum per subsystem: the scalar root finder, the equation of state,
//! the enrichment state machine, mesh geometry, and the cohesive model.
//! [`StepError`] wraps them with the entity context (cell id, partition)
//! needed to diagnose an aborted run. There is no transient error class:
//! any inconsistency invalidates the remaining timeline, so every error
//! here is fatal to the simulation that produced it.

use std::error::Error;
use std::fmt;

use crate::id::{CellId, NodeId, Partition};

/// Errors from the Newton–Raphson root finder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolveError {
    /// The iteration cap was reached before the residual converged.
    NonConvergence {
        /// Number of iterations performed.
        iterations: u32,
        /// Residual at the last iterate.
        residual: f64,
    },
    /// The residual derivative vanished and the iteration cannot proceed.
    SingularDerivative {
        /// The iterate at which the derivative vanished.
        at: f64,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonConvergence {
                iterations,
                residual,
            } => write!(
                f,
                "no convergence after {iterations} iterations (residual {residual:e})"
            ),
            Self::SingularDerivative { at } => {
                write!(f, "residual derivative vanished at iterate {at:e}")
            }
        }
    }
}

impl Error for SolveError {}

/// Errors from equation-of-state evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EosError {
    /// The squared sound speed came out non-positive: the requested
    /// (volume, energy) state is outside the EOS validity domain.
    NonPhysicalSoundSpeed {
        /// Specific volume at the offending state.
        specific_volume: f64,
        /// Specific internal energy at the offending state.
        energy: f64,
        /// The non-positive squared sound speed.
        squared: f64,
    },
    /// Specific volume must be strictly positive.
    InvalidSpecificVolume {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for EosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPhysicalSoundSpeed {
                specific_volume,
                energy,
                squared,
            } => write!(
                f,
                "non-physical sound speed (c^2 = {squared:e}) at v = {specific_volume:e}, \
                 e = {energy:e}"
            ),
            Self::InvalidSpecificVolume { value } => {
                write!(f, "specific volume must be > 0, got {value:e}")
            }
        }
    }
}

impl Error for EosError {}

/// Invalid enrichment state transitions.
///
/// These indicate a programming or model-configuration error and are
/// never silently ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// Attempted to enrich a cell that is already enriched.
    AlreadyEnriched {
        /// The offending cell.
        cell: CellId,
    },
    /// Attempted to de-enrich a cell that is classical.
    NotEnriched {
        /// The offending cell.
        cell: CellId,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyEnriched { cell } => {
                write!(f, "cell {cell} is already enriched; cannot enrich it twice")
            }
            Self::NotEnriched { cell } => {
                write!(f, "cell {cell} is classical; cannot de-enrich it")
            }
        }
    }
}

impl Error for TransitionError {}

/// Mesh construction and geometry errors.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshError {
    /// Two arrays that must share a shape do not.
    ShapeMismatch {
        /// What was being matched (e.g. "initial velocities").
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// Node coordinates must be strictly increasing.
    NonMonotonicNodes {
        /// First node whose coordinate does not exceed its predecessor's.
        node: NodeId,
    },
    /// A cell degenerated to zero or negative length.
    DegenerateCell {
        /// The offending cell.
        cell: CellId,
        /// Which partition collapsed.
        partition: Partition,
        /// The non-positive size.
        size: f64,
    },
    /// A mesh needs at least two nodes (one cell).
    TooFewNodes {
        /// The offending node count.
        count: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected length {expected}, got {actual}"),
            Self::NonMonotonicNodes { node } => {
                write!(f, "node coordinates must be strictly increasing at node {node}")
            }
            Self::DegenerateCell {
                cell,
                partition,
                size,
            } => write!(
                f,
                "cell {cell} ({partition} partition) degenerated to size {size:e}"
            ),
            Self::TooFewNodes { count } => {
                write!(f, "a 1D mesh needs at least 2 nodes, got {count}")
            }
        }
    }
}

impl Error for MeshError {}

/// Errors from cohesive-law construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CohesiveError {
    /// The local stress is too small to seed a cohesive law.
    ///
    /// The energy-driven calculation strategy divides by the critical
    /// strength; a (near-)zero strength makes the separation unbounded.
    DegenerateStrength {
        /// The local stress the strength would be taken from.
        stress: f64,
    },
    /// The derived or prescribed critical separation is not positive.
    InvalidSeparation {
        /// The offending value.
        value: f64,
    },
    /// The coupling unloading thresholds are ordered the wrong way.
    InvalidUnloadingThresholds {
        /// Opening above which porosity growth is blocked.
        coupling: f64,
        /// Opening below which de-enrichment is considered.
        porosity: f64,
    },
}

impl fmt::Display for CohesiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateStrength { stress } => write!(
                f,
                "local stress {stress:e} is too small to build a cohesive law"
            ),
            Self::InvalidSeparation { value } => {
                write!(f, "critical separation must be > 0, got {value:e}")
            }
            Self::InvalidUnloadingThresholds { coupling, porosity } => write!(
                f,
                "porosity threshold {porosity:e} must not exceed coupling threshold {coupling:e}"
            ),
        }
    }
}

impl Error for CohesiveError {}

/// Error returned from a failed simulation step.
///
/// Wraps the subsystem error with the entity the step was operating on
/// when it failed. Any `StepError` aborts the run.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The implicit energy solve did not converge for a partition.
    EnergySolve {
        /// Cell whose partition failed to converge.
        cell: CellId,
        /// Which partition was being resolved.
        partition: Partition,
        /// The underlying solver error.
        source: SolveError,
    },
    /// The equation of state rejected a partition's state.
    Eos {
        /// Cell whose partition was rejected.
        cell: CellId,
        /// Which partition was being evaluated.
        partition: Partition,
        /// The underlying EOS error.
        source: EosError,
    },
    /// An invalid enrichment transition was attempted.
    Transition(TransitionError),
    /// The mesh geometry became invalid during the update.
    Geometry(MeshError),
    /// A cohesive law could not be built at enrichment time.
    Cohesive {
        /// Cell being enriched.
        cell: CellId,
        /// The underlying cohesive error.
        source: CohesiveError,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnergySolve {
                cell,
                partition,
                source,
            } => write!(
                f,
                "energy solve failed for cell {cell} ({partition} partition): {source}"
            ),
            Self::Eos {
                cell,
                partition,
                source,
            } => write!(
                f,
                "EOS evaluation failed for cell {cell} ({partition} partition): {source}"
            ),
            Self::Transition(e) => write!(f, "invalid transition: {e}"),
            Self::Geometry(e) => write!(f, "invalid geometry: {e}"),
            Self::Cohesive { cell, source } => {
                write!(f, "cohesive law construction failed for cell {cell}: {source}")
            }
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EnergySolve { source, .. } => Some(source),
            Self::Eos { source, .. } => Some(source),
            Self::Transition(e) => Some(e),
            Self::Geometry(e) => Some(e),
            Self::Cohesive { source, .. } => Some(source),
        }
    }
}

impl From<TransitionError> for StepError {
    fn from(e: TransitionError) -> Self {
        Self::Transition(e)
    }
}

impl From<MeshError> for StepError {
    fn from(e: MeshError) -> Self {
        Self::Geometry(e)
    }
}
