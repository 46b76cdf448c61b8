//! Reusable simulation fixtures for Spall tests and benches.
//!
//! Two standard configurations:
//!
//! - [`uniform_bar_config`] — a copper bar at rest, free boundaries.
//! - [`pulled_apart_bar_config`] — the same bar with its two halves
//!   moving apart, so exactly one cell (the mid-plane) goes into
//!   tension and ruptures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use spall_cohesive::{LinearCalculation, LossOfStiffnessUnloading};
use spall_engine::{
    CohesiveProps, ConstantPressure, MaterialProps, NumericsParams, SimulationConfig,
};
use spall_material::{
    ConstantShearModulus, ConstantYieldStress, MieGruneisen, NewtonRaphson,
};
use spall_rupture::MinimumPressureCriterion;

/// Cell size of the fixture bars [m].
pub const CELL_SIZE: f64 = 1.0e-3;

/// Cross-section of the fixture bars [m2].
pub const SECTION: f64 = 1.0e-4;

/// Rupture threshold of the fixture criterion [Pa].
pub const PRESSURE_LIMIT: f64 = -1.0e8;

/// A copper bar of `cell_count` millimetre cells, at rest, with free
/// (zero-pressure) boundaries and a minimum-pressure rupture criterion.
pub fn uniform_bar_config(cell_count: usize) -> SimulationConfig {
    let eos = MieGruneisen::copper();
    let node_count = cell_count + 1;
    let initial_coordinates: Vec<f64> = (0..node_count).map(|i| i as f64 * CELL_SIZE).collect();
    SimulationConfig {
        initial_coordinates,
        initial_velocities: vec![0.0; node_count],
        section: SECTION,
        rupture_position: 0.5,
        material: MaterialProps {
            initial_density: eos.rho_zero,
            initial_pressure: 0.0,
            initial_energy: 0.0,
            initial_porosity: 1.0,
            eos: Box::new(eos),
            shear_modulus: Box::new(ConstantShearModulus { value: 45.0e9 }),
            yield_stress: Box::new(ConstantYieldStress { value: 1.2e8 }),
        },
        numerics: NumericsParams {
            pseudo_a: 1.5,
            pseudo_b: 0.2,
            cfl: 0.95,
            newton: NewtonRaphson::default(),
        },
        rupture_criterion: Box::new(MinimumPressureCriterion::new(PRESSURE_LIMIT)),
        cohesive: CohesiveProps {
            calculation: Box::new(LinearCalculation {
                critical_separation: 1.0e-5,
            }),
            unloading: Box::new(LossOfStiffnessUnloading),
        },
        left_boundary: Box::new(ConstantPressure::new(0.0)),
        right_boundary: Box::new(ConstantPressure::new(0.0)),
    }
}

/// The uniform bar with its left half moving at `-pull_velocity` and its
/// right half at `+pull_velocity`.
///
/// Only the mid-plane cell (index `cell_count / 2`) stretches; every
/// other cell translates rigidly. With the fixture pressure limit the
/// mid cell goes past the rupture threshold within a few 10 ns steps.
pub fn pulled_apart_bar_config(cell_count: usize, pull_velocity: f64) -> SimulationConfig {
    let mut config = uniform_bar_config(cell_count);
    let split_node = cell_count / 2;
    for (i, v) in config.initial_velocities.iter_mut().enumerate() {
        *v = if i <= split_node {
            -pull_velocity
        } else {
            pull_velocity
        };
    }
    config
}
