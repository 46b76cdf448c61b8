//! Cohesive zone model and discontinuity bookkeeping for the Spall
//! solver.
//!
//! A [`Discontinuity`] is the run-time record of one active crack: its
//! split geometry, crack-face kinematic dofs, and cohesive history
//! (opening, damage, dissipated energy). The [`CohesiveZoneModel`] turns
//! a new opening into a traction and updates that history; the
//! [`DiscontinuityRegistry`] owns every live record behind handles that
//! removal can never invalidate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod calculation;
pub mod discontinuity;
pub mod law;
pub mod registry;
pub mod unloading;
pub mod zone;

pub use calculation::{CohesiveCalculationModel, EnergyCalculation, LinearCalculation};
pub use discontinuity::{Discontinuity, Face};
pub use law::CohesiveLaw;
pub use registry::DiscontinuityRegistry;
pub use unloading::{
    ConstantStiffnessUnloading, CouplingUnloading, LossOfStiffnessUnloading, PorosityGate,
    UnloadingModel, UnloadingResponse,
};
pub use zone::{CohesiveOutcome, CohesiveZoneModel};
