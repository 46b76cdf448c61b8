//! Calculation strategies that size the cohesive law at enrichment time.

use spall_core::CohesiveError;
use std::fmt;

use crate::law::CohesiveLaw;

/// Builds a [`CohesiveLaw`] (plus its energy-to-dissipate target, per
/// unit crack area) from the local cell state at the moment of
/// enrichment.
///
/// The critical strength is always taken from the magnitude of the local
/// axial stress; the strategies differ in how the critical separation is
/// fixed.
pub trait CohesiveCalculationModel: fmt::Debug + Send {
    /// Strategy name for error reporting.
    fn name(&self) -> &str;

    /// Build the law and its dissipation target from the local stress.
    fn build_law(&self, local_stress: f64) -> Result<(CohesiveLaw, f64), CohesiveError>;
}

/// Linear law with a prescribed critical separation.
///
/// The energy target follows from the law: `strength * separation / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearCalculation {
    /// Prescribed critical separation [m].
    pub critical_separation: f64,
}

impl CohesiveCalculationModel for LinearCalculation {
    fn name(&self) -> &str {
        "linear"
    }

    fn build_law(&self, local_stress: f64) -> Result<(CohesiveLaw, f64), CohesiveError> {
        let law = CohesiveLaw::new(local_stress.abs(), self.critical_separation)?;
        Ok((law, law.max_dissipated_energy()))
    }
}

/// Linear law sized to dissipate a prescribed energy per unit area.
///
/// The separation follows from the target: `2 E / strength`. A
/// (near-)zero local stress makes the separation unbounded and is
/// rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyCalculation {
    /// Energy to dissipate by complete separation [J/m2].
    pub energy_to_dissipate: f64,
}

impl CohesiveCalculationModel for EnergyCalculation {
    fn name(&self) -> &str {
        "dissipated_energy"
    }

    fn build_law(&self, local_stress: f64) -> Result<(CohesiveLaw, f64), CohesiveError> {
        let strength = local_stress.abs();
        if strength < f64::EPSILON {
            return Err(CohesiveError::DegenerateStrength {
                stress: local_stress,
            });
        }
        let separation = 2.0 * self.energy_to_dissipate / strength;
        let law = CohesiveLaw::new(strength, separation)?;
        Ok((law, self.energy_to_dissipate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_takes_strength_from_stress_magnitude() {
        let calc = LinearCalculation {
            critical_separation: 1.0e-5,
        };
        let (law, target) = calc.build_law(-2.0e9).unwrap();
        assert_eq!(law.critical_strength, 2.0e9);
        assert_eq!(law.critical_separation, 1.0e-5);
        assert!((target - 1.0e4).abs() < 1e-9);
    }

    #[test]
    fn energy_model_derives_separation() {
        let calc = EnergyCalculation {
            energy_to_dissipate: 1.0e4,
        };
        let (law, target) = calc.build_law(2.0e9).unwrap();
        assert!((law.critical_separation - 1.0e-5).abs() < 1e-15);
        assert_eq!(target, 1.0e4);
        // The law's own triangle area reproduces the target.
        assert!((law.max_dissipated_energy() - target).abs() < 1e-9);
    }

    #[test]
    fn energy_model_rejects_zero_stress() {
        let calc = EnergyCalculation {
            energy_to_dissipate: 1.0e4,
        };
        assert!(matches!(
            calc.build_law(0.0),
            Err(CohesiveError::DegenerateStrength { .. })
        ));
    }
}
