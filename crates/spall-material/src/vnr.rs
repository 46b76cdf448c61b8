//! The implicit VNR energy equation and the per-partition solve.
//!
//! The von Neumann–Richtmyer scheme closes each partition's update with
//! the implicit midpoint energy equation
//!
//! ```text
//! e_new - e_old + (p(v_new, e_new) + p_old + 2 q_old) / 2 * (v_new - v_old) = 0
//! ```
//!
//! solved for `e_new` by Newton iteration, followed by one full EOS
//! evaluation at the root for the published pressure and sound speed.

use spall_core::{EosError, SolveError};
use std::error::Error;
use std::fmt;

use crate::eos::{EquationOfState, EosOutput};
use crate::newton::{NewtonRaphson, ResidualFunction};

/// Residual of the implicit midpoint energy equation for one partition.
pub struct VnrEnergyResidual<'a> {
    eos: &'a dyn EquationOfState,
    new_specific_volume: f64,
    delta_volume: f64,
    effective_pressure: f64,
    old_energy: f64,
}

impl<'a> VnrEnergyResidual<'a> {
    /// Build the residual for one partition.
    ///
    /// `effective_pressure` is the explicit half of the midpoint pressure:
    /// `p_old + 2 * q_old`.
    pub fn new(
        eos: &'a dyn EquationOfState,
        old_specific_volume: f64,
        new_specific_volume: f64,
        effective_pressure: f64,
        old_energy: f64,
    ) -> Self {
        Self {
            eos,
            new_specific_volume,
            delta_volume: new_specific_volume - old_specific_volume,
            effective_pressure,
            old_energy,
        }
    }
}

impl ResidualFunction for VnrEnergyResidual<'_> {
    fn evaluate(&self, energy: f64) -> (f64, f64) {
        let (pressure, dp_de) = self
            .eos
            .pressure_and_derivative(self.new_specific_volume, energy);
        let residual = energy - self.old_energy
            + 0.5 * (pressure + self.effective_pressure) * self.delta_volume;
        let derivative = 1.0 + 0.5 * dp_de * self.delta_volume;
        (residual, derivative)
    }
}

/// Converged state of one partition after the energy solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergySolution {
    /// New specific internal energy [J/kg].
    pub energy: f64,
    /// New pressure [Pa].
    pub pressure: f64,
    /// New sound speed [m/s].
    pub sound_speed: f64,
}

/// Failure of a per-partition energy solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartitionError {
    /// The Newton iteration did not converge.
    Solve(SolveError),
    /// The EOS rejected the state.
    Eos(EosError),
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solve(e) => write!(f, "{e}"),
            Self::Eos(e) => write!(f, "{e}"),
        }
    }
}

impl Error for PartitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Solve(e) => Some(e),
            Self::Eos(e) => Some(e),
        }
    }
}

/// Solve one partition's new energy, pressure, and sound speed.
///
/// `effective_pressure` must be `p_old + 2 * q_old`. The solver is
/// stateless: this function is called for every partition needing
/// resolution on every step.
pub fn solve_partition_energy(
    eos: &dyn EquationOfState,
    solver: &NewtonRaphson,
    old_density: f64,
    new_density: f64,
    effective_pressure: f64,
    old_energy: f64,
) -> Result<EnergySolution, PartitionError> {
    if old_density <= 0.0 {
        return Err(PartitionError::Eos(EosError::InvalidSpecificVolume {
            value: old_density,
        }));
    }
    if new_density <= 0.0 {
        return Err(PartitionError::Eos(EosError::InvalidSpecificVolume {
            value: new_density,
        }));
    }
    let v_old = 1.0 / old_density;
    let v_new = 1.0 / new_density;
    let residual = VnrEnergyResidual::new(eos, v_old, v_new, effective_pressure, old_energy);
    let energy = solver
        .solve(&residual, old_energy)
        .map_err(PartitionError::Solve)?;
    let EosOutput {
        pressure,
        sound_speed,
        ..
    } = eos.evaluate(v_new, energy).map_err(PartitionError::Eos)?;
    Ok(EnergySolution {
        energy,
        pressure,
        sound_speed,
    })
}
