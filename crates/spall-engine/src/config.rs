//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the explicitly constructed input for
//! [`Simulation::new`](crate::Simulation::new): initial mesh state,
//! material models, numerical coefficients, and the rupture/cohesive
//! model choices. [`validate()`](SimulationConfig::validate) checks every
//! structural invariant at construction time; nothing in the core reads
//! ambient global state.

use std::error::Error;
use std::fmt;

use spall_cohesive::{CohesiveCalculationModel, UnloadingModel};
use spall_core::{EosError, MeshError, NodeId};
use spall_material::{EquationOfState, NewtonRaphson, ShearModulusModel, YieldStressModel};
use spall_rupture::RuptureCriterion;

use crate::loading::PressureLaw;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`] or
/// construction.
#[derive(Debug)]
pub enum ConfigError {
    /// The initial mesh arrays are malformed.
    Mesh(MeshError),
    /// The EOS rejected the initial state.
    Eos(EosError),
    /// Section area must be finite and positive.
    InvalidSection {
        /// The offending value.
        value: f64,
    },
    /// The rupture split fraction must lie strictly inside (0, 1).
    InvalidRupturePosition {
        /// The offending value.
        value: f64,
    },
    /// The CFL factor must lie in (0, 1].
    InvalidCfl {
        /// The offending value.
        value: f64,
    },
    /// A pseudo-viscosity coefficient is negative or non-finite.
    InvalidPseudoCoefficient {
        /// Which coefficient ("a" or "b").
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The Newton solver parameters are unusable.
    InvalidNewton {
        /// What is wrong with them.
        reason: &'static str,
    },
    /// An initial material value is out of its physical range.
    InvalidInitialState {
        /// Which quantity.
        what: &'static str,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mesh(e) => write!(f, "mesh: {e}"),
            Self::Eos(e) => write!(f, "initial EOS evaluation: {e}"),
            Self::InvalidSection { value } => {
                write!(f, "section must be finite and > 0, got {value}")
            }
            Self::InvalidRupturePosition { value } => {
                write!(f, "rupture position must be in (0, 1), got {value}")
            }
            Self::InvalidCfl { value } => {
                write!(f, "CFL factor must be in (0, 1], got {value}")
            }
            Self::InvalidPseudoCoefficient { name, value } => {
                write!(f, "pseudo coefficient {name} must be finite and >= 0, got {value}")
            }
            Self::InvalidNewton { reason } => write!(f, "newton solver: {reason}"),
            Self::InvalidInitialState { what, value } => {
                write!(f, "initial {what} out of range: {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mesh(e) => Some(e),
            Self::Eos(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for ConfigError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<EosError> for ConfigError {
    fn from(e: EosError) -> Self {
        Self::Eos(e)
    }
}

// ── Model bundles ──────────────────────────────────────────────────

/// Material state and constitutive models.
#[derive(Debug)]
pub struct MaterialProps {
    /// Initial density [kg/m3].
    pub initial_density: f64,
    /// Initial pressure [Pa].
    pub initial_pressure: f64,
    /// Initial specific internal energy [J/kg].
    pub initial_energy: f64,
    /// Initial porosity (>= 1, 1 = fully dense).
    pub initial_porosity: f64,
    /// The equation of state.
    pub eos: Box<dyn EquationOfState>,
    /// Shear modulus model for the deviatoric update.
    pub shear_modulus: Box<dyn ShearModulusModel>,
    /// Yield stress model for the radial return.
    pub yield_stress: Box<dyn YieldStressModel>,
}

/// Numerical coefficients of the explicit scheme.
#[derive(Clone, Copy, Debug)]
pub struct NumericsParams {
    /// Quadratic pseudo-viscosity coefficient.
    pub pseudo_a: f64,
    /// Linear pseudo-viscosity coefficient.
    pub pseudo_b: f64,
    /// CFL safety factor in (0, 1].
    pub cfl: f64,
    /// Newton solver for the implicit energy equation.
    pub newton: NewtonRaphson,
}

/// Cohesive model choices: how laws are sized and how they unload.
#[derive(Debug)]
pub struct CohesiveProps {
    /// Strategy sizing each cohesive law at enrichment time.
    pub calculation: Box<dyn CohesiveCalculationModel>,
    /// Unloading sub-model shared by every discontinuity.
    pub unloading: Box<dyn UnloadingModel>,
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for constructing a [`Simulation`](crate::Simulation).
///
/// Consumed by the constructor; there is no global configuration state.
#[derive(Debug)]
pub struct SimulationConfig {
    /// Initial node coordinates, strictly increasing [m].
    pub initial_coordinates: Vec<f64>,
    /// Initial node velocities, one per coordinate [m/s].
    pub initial_velocities: Vec<f64>,
    /// Rod cross-section area [m2].
    pub section: f64,
    /// Fractional crack position inside a ruptured cell, in (0, 1).
    pub rupture_position: f64,
    /// Material state and constitutive models.
    pub material: MaterialProps,
    /// Numerical coefficients.
    pub numerics: NumericsParams,
    /// The rupture criterion.
    pub rupture_criterion: Box<dyn RuptureCriterion>,
    /// Cohesive model choices.
    pub cohesive: CohesiveProps,
    /// Pressure law applied at the left end node.
    pub left_boundary: Box<dyn PressureLaw>,
    /// Pressure law applied at the right end node.
    pub right_boundary: Box<dyn PressureLaw>,
}

impl SimulationConfig {
    /// Validate every structural invariant.
    ///
    /// Pure pass: no intermediate artifacts are produced. The
    /// constructor re-uses the same mesh checks through the stores.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Mesh arrays.
        let n = self.initial_coordinates.len();
        if n < 2 {
            return Err(MeshError::TooFewNodes { count: n }.into());
        }
        if self.initial_velocities.len() != n {
            return Err(MeshError::ShapeMismatch {
                what: "initial velocities",
                expected: n,
                actual: self.initial_velocities.len(),
            }
            .into());
        }
        for i in 1..n {
            if self.initial_coordinates[i] <= self.initial_coordinates[i - 1] {
                return Err(MeshError::NonMonotonicNodes {
                    node: NodeId(i as u32),
                }
                .into());
            }
        }
        // 2. Geometry and scheme coefficients.
        if !(self.section > 0.0 && self.section.is_finite()) {
            return Err(ConfigError::InvalidSection {
                value: self.section,
            });
        }
        if !(self.rupture_position > 0.0 && self.rupture_position < 1.0) {
            return Err(ConfigError::InvalidRupturePosition {
                value: self.rupture_position,
            });
        }
        if !(self.numerics.cfl > 0.0 && self.numerics.cfl <= 1.0) {
            return Err(ConfigError::InvalidCfl {
                value: self.numerics.cfl,
            });
        }
        if !(self.numerics.pseudo_a >= 0.0 && self.numerics.pseudo_a.is_finite()) {
            return Err(ConfigError::InvalidPseudoCoefficient {
                name: "a",
                value: self.numerics.pseudo_a,
            });
        }
        if !(self.numerics.pseudo_b >= 0.0 && self.numerics.pseudo_b.is_finite()) {
            return Err(ConfigError::InvalidPseudoCoefficient {
                name: "b",
                value: self.numerics.pseudo_b,
            });
        }
        if !(self.numerics.newton.tolerance > 0.0) {
            return Err(ConfigError::InvalidNewton {
                reason: "tolerance must be > 0",
            });
        }
        if self.numerics.newton.max_iterations == 0 {
            return Err(ConfigError::InvalidNewton {
                reason: "iteration cap must be at least 1",
            });
        }
        // 3. Initial material state.
        if !(self.material.initial_density > 0.0) {
            return Err(ConfigError::InvalidInitialState {
                what: "density",
                value: self.material.initial_density,
            });
        }
        if !(self.material.initial_porosity >= 1.0) {
            return Err(ConfigError::InvalidInitialState {
                what: "porosity",
                value: self.material.initial_porosity,
            });
        }
        Ok(())
    }
}
