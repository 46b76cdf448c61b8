//! Rheology models: shear modulus, yield stress, deviatoric update.

use std::fmt;

/// Shear modulus as a function of the current density.
pub trait ShearModulusModel: fmt::Debug + Send + Sync {
    /// Shear modulus [Pa] at the given density.
    fn shear_modulus(&self, density: f64) -> f64;
}

/// Density-independent shear modulus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantShearModulus {
    /// The constant shear modulus [Pa].
    pub value: f64,
}

impl ShearModulusModel for ConstantShearModulus {
    fn shear_modulus(&self, _density: f64) -> f64 {
        self.value
    }
}

/// Yield stress as a function of the current density.
pub trait YieldStressModel: fmt::Debug + Send + Sync {
    /// Yield stress [Pa] at the given density.
    fn yield_stress(&self, density: f64) -> f64;
}

/// Density-independent yield stress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantYieldStress {
    /// The constant yield stress [Pa].
    pub value: f64,
}

impl YieldStressModel for ConstantYieldStress {
    fn yield_stress(&self, _density: f64) -> f64 {
        self.value
    }
}

/// Elastic predictor / radial return for the 1D deviatoric stress.
///
/// In uniaxial strain the deviatoric strain rate is `(2/3) * d`, with
/// `d` the axial velocity gradient. The trial stress
/// `s + 2 G (2/3) d dt` is returned to the von Mises surface, which in
/// 1D is the interval `[-2Y/3, 2Y/3]`.
pub fn update_deviatoric_stress(
    deviator_old: f64,
    strain_rate: f64,
    dt: f64,
    shear_modulus: f64,
    yield_stress: f64,
) -> f64 {
    let trial = deviator_old + 2.0 * shear_modulus * (2.0 / 3.0) * strain_rate * dt;
    let limit = 2.0 / 3.0 * yield_stress;
    trial.clamp(-limit, limit)
}
