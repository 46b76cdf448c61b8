//! The [`RuptureCriterion`] trait and its evaluation input.

use spall_mesh::CellStore;
use std::error::Error;
use std::fmt;

/// Read-only view a criterion evaluates against.
///
/// Cell centers are precomputed by the engine each evaluation: `centers`
/// holds the base-partition center of every cell (the left sub-partition
/// center once a cell is enriched) and `right_centers` the right
/// sub-partition centers, meaningful only where the cell is enriched.
pub struct CriterionInput<'a> {
    /// The whole cell state.
    pub cells: &'a CellStore,
    /// Base-partition center coordinate per cell.
    pub centers: &'a [f64],
    /// Right sub-partition center coordinate per cell.
    pub right_centers: &'a [f64],
}

/// A rupture condition over the whole cell state.
///
/// `evaluate` returns one flag per cell, `true` where the condition
/// holds at the current step. Criteria are stateless: the same input
/// always produces the same mask.
pub trait RuptureCriterion: fmt::Debug + Send {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// The rupture mask, one entry per cell.
    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool>;
}

/// Construction-time rejection of a malformed criterion.
#[derive(Clone, Debug, PartialEq)]
pub enum CriterionError {
    /// A compound criterion needs a second (threshold) criterion.
    MissingSecondCriterion,
    /// The non-local averaging radius must be positive and finite.
    InvalidRadius {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for CriterionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSecondCriterion => {
                write!(f, "double criterion requires a second criterion")
            }
            Self::InvalidRadius { value } => {
                write!(f, "averaging radius must be finite and > 0, got {value}")
            }
        }
    }
}

impl Error for CriterionError {}
