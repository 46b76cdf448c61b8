//! In-crate copies of the standard simulation fixtures for
//! `spall-engine`'s own unit tests.
//!
//! These mirror [`spall_test_utils`] exactly, but are built against the
//! crate-under-test instance of the engine types. The `spall-test-utils`
//! crate depends on `spall-engine`, so its fixtures produce types from
//! the *plain* (non-test) build; unit tests compiled with `cfg(test)`
//! see a distinct crate instance and cannot accept those values. The
//! integration tests in `tests/` link the plain build and use
//! `spall_test_utils` directly; only the in-`src/` unit tests need this
//! local copy.

#![allow(dead_code)]

use spall_cohesive::{LinearCalculation, LossOfStiffnessUnloading};
use spall_material::{ConstantShearModulus, ConstantYieldStress, MieGruneisen, NewtonRaphson};
use spall_rupture::MinimumPressureCriterion;

use crate::config::{CohesiveProps, MaterialProps, NumericsParams, SimulationConfig};
use crate::loading::ConstantPressure;

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
