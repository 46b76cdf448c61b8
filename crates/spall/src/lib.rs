//! Spall: a 1D explicit Lagrangian solver for dynamic spall fracture.
//!
//! The solver marches a rod of cells through explicit steps — nodal
//! kinematics, a per-cell implicit EOS solve, shock-stabilizing
//! pseudo-viscosity — and, when a rupture criterion fires, splits the
//! offending cell into two independently evolving sub-partitions joined
//! by a cohesive-zone crack interface.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Spall sub-crates. For most users, adding `spall` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use spall::prelude::*;
//!
//! let eos = MieGruneisen::copper();
//! let nodes: Vec<f64> = (0..=8).map(|i| i as f64 * 1.0e-3).collect();
//! let config = SimulationConfig {
//!     initial_velocities: vec![0.0; nodes.len()],
//!     initial_coordinates: nodes,
//!     section: 1.0e-4,
//!     rupture_position: 0.5,
//!     material: MaterialProps {
//!         initial_density: eos.rho_zero,
//!         initial_pressure: 0.0,
//!         initial_energy: 0.0,
//!         initial_porosity: 1.0,
//!         eos: Box::new(eos),
//!         shear_modulus: Box::new(ConstantShearModulus { value: 45.0e9 }),
//!         yield_stress: Box::new(ConstantYieldStress { value: 1.2e8 }),
//!     },
//!     numerics: NumericsParams {
//!         pseudo_a: 1.5,
//!         pseudo_b: 0.2,
//!         cfl: 0.95,
//!         newton: NewtonRaphson::default(),
//!     },
//!     rupture_criterion: Box::new(MinimumPressureCriterion::new(-7.0e9)),
//!     cohesive: CohesiveProps {
//!         calculation: Box::new(LinearCalculation { critical_separation: 1.0e-5 }),
//!         unloading: Box::new(LossOfStiffnessUnloading),
//!     },
//!     left_boundary: Box::new(ConstantPressure::new(0.0)),
//!     right_boundary: Box::new(ConstantPressure::new(0.0)),
//! };
//!
//! let mut sim = Simulation::new(config).unwrap();
//! let outcome = sim.step(1.0e-8).unwrap();
//! assert!(outcome.critical_dt > 0.0);
//! assert!(sim.snapshot().enriched_cells().is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `spall-core` | Ids, errors, state containers |
//! | [`mesh`] | `spall-mesh` | Topology and node/cell stores |
//! | [`material`] | `spall-material` | EOS, energy solver, rheology |
//! | [`rupture`] | `spall-rupture` | Rupture criteria |
//! | [`cohesive`] | `spall-cohesive` | Cohesive law, unloading, registry |
//! | [`engine`] | `spall-engine` | Config, step loop, observation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, errors, and state containers (`spall-core`).
pub use spall_core as types;

/// Mesh topology and field stores (`spall-mesh`).
///
/// [`mesh::Topology1D`] answers adjacency queries; [`mesh::NodeStore`]
/// and [`mesh::CellStore`] hold the whole-array state.
pub use spall_mesh as mesh;

/// Constitutive models (`spall-material`).
///
/// The [`material::EquationOfState`] trait with the Mie–Grüneisen
/// implementation, the Newton energy solver, and the rheology models.
pub use spall_material as material;

/// Rupture criteria (`spall-rupture`).
pub use spall_rupture as rupture;

/// Cohesive zone model and discontinuity registry (`spall-cohesive`).
pub use spall_cohesive as cohesive;

/// Simulation engine (`spall-engine`).
///
/// [`engine::Simulation`] owns all state; one call to
/// [`engine::Simulation::step`] advances the rod by one explicit step.
pub use spall_engine as engine;

/// Common imports for typical Spall usage.
///
/// ```rust
/// use spall::prelude::*;
/// ```
pub mod prelude {
    // Core ids and errors
    pub use spall_core::{
        CellId, DiscontinuityId, EosError, MeshError, NodeId, Partition, SolveError, StepError,
        TransitionError,
    };

    // Mesh
    pub use spall_mesh::{CellStore, NodeStore, Topology1D};

    // Material
    pub use spall_material::{
        ConstantShearModulus, ConstantYieldStress, EquationOfState, MieGruneisen, NewtonRaphson,
    };

    // Rupture
    pub use spall_rupture::{
        DoubleCriterion, MaximalStressCriterion, MinimumPressureCriterion,
        NonLocalStressCriterion, PorosityCriterion, RuptureCriterion,
    };

    // Cohesive
    pub use spall_cohesive::{
        CohesiveLaw, ConstantStiffnessUnloading, CouplingUnloading, Discontinuity,
        EnergyCalculation, LinearCalculation, LossOfStiffnessUnloading, UnloadingModel,
    };

    // Engine
    pub use spall_engine::{
        CohesiveProps, ConfigError, ConstantPressure, MaterialProps, NumericsParams, PressureLaw,
        Simulation, SimulationConfig, StepMetrics, StepOutcome, TwoStepsPressure,
    };
}
