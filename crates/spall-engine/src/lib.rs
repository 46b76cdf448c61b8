//! Simulation engine for the Spall solver.
//!
//! [`Simulation`] owns all state — mesh stores, the discontinuity
//! registry, the configured models — and executes one explicit step at a
//! time in a fixed order: kinematics, geometry, EOS solve, pseudo,
//! stress, rupture/enrichment, force assembly, CFL. The driver owns the
//! time-stepping cadence; the critical timestep returned from each step
//! is advisory.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod enrichment;
mod forces;
pub mod loading;
pub mod metrics;
pub mod observation;
pub mod simulation;

#[cfg(test)]
mod test_fixtures;

pub use config::{ConfigError, CohesiveProps, MaterialProps, NumericsParams, SimulationConfig};
pub use loading::{ConstantPressure, PressureLaw, TwoStepsPressure};
pub use metrics::StepMetrics;
pub use observation::{DiscontinuityInfo, SimulationSnapshot};
pub use simulation::{Simulation, StepOutcome};
