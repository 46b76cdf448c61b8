//! Rupture criteria for the Spall solver.
//!
//! A criterion maps the whole cell state to a boolean mask: `true` where
//! the rupture condition holds *now*. Masks compose elementwise; the
//! enrichment manager decides what actually ruptures (one discontinuity
//! per cell, never a second one while the first lives).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod criterion;
pub mod double;
pub mod nonlocal;
pub mod threshold;

pub use criterion::{CriterionError, CriterionInput, RuptureCriterion};
pub use double::{DoubleCriterion, DoubleCriterionBuilder};
pub use nonlocal::NonLocalStressCriterion;
pub use threshold::{
    HalfRodComparisonCriterion, MaximalStressCriterion, MinimumPressureCriterion,
    PorosityCriterion,
};
