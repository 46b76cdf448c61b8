//! The linear traction–separation law.

use spall_core::CohesiveError;

/// A linear cohesive traction–separation law.
///
/// Traction decays linearly from `critical_strength` at zero opening to
/// zero at `critical_separation`, and stays zero beyond. The parameters
/// are frozen at enrichment time; only the owning discontinuity's
/// history evolves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CohesiveLaw {
    /// Traction at zero opening [Pa].
    pub critical_strength: f64,
    /// Opening at which traction vanishes [m].
    pub critical_separation: f64,
}

impl CohesiveLaw {
    /// Build a law, rejecting a non-positive separation or a negative
    /// strength.
    pub fn new(critical_strength: f64, critical_separation: f64) -> Result<Self, CohesiveError> {
        if !(critical_separation > 0.0 && critical_separation.is_finite()) {
            return Err(CohesiveError::InvalidSeparation {
                value: critical_separation,
            });
        }
        if !(critical_strength >= 0.0 && critical_strength.is_finite()) {
            return Err(CohesiveError::DegenerateStrength {
                stress: critical_strength,
            });
        }
        Ok(Self {
            critical_strength,
            critical_separation,
        })
    }

    /// Monotonic loading traction at the given opening.
    pub fn force(&self, opening: f64) -> f64 {
        if opening <= 0.0 {
            self.critical_strength
        } else if opening >= self.critical_separation {
            0.0
        } else {
            self.critical_strength * (1.0 - opening / self.critical_separation)
        }
    }

    /// Energy dissipated per unit area by complete separation.
    pub fn max_dissipated_energy(&self) -> f64 {
        self.critical_strength * self.critical_separation / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            CohesiveLaw::new(1.0e9, 0.0),
            Err(CohesiveError::InvalidSeparation { .. })
        ));
        assert!(matches!(
            CohesiveLaw::new(-1.0, 1.0e-6),
            Err(CohesiveError::DegenerateStrength { .. })
        ));
        assert!(CohesiveLaw::new(1.0e9, 1.0e-6).is_ok());
    }

    #[test]
    fn endpoints() {
        let law = CohesiveLaw::new(2.0e9, 1.0e-5).unwrap();
        assert_eq!(law.force(0.0), 2.0e9);
        assert_eq!(law.force(1.0e-5), 0.0);
        assert_eq!(law.force(2.0e-5), 0.0);
        assert!((law.force(0.5e-5) - 1.0e9).abs() < 1.0);
    }

    #[test]
    fn max_dissipation_is_triangle_area() {
        let law = CohesiveLaw::new(2.0e9, 1.0e-5).unwrap();
        assert!((law.max_dissipated_energy() - 1.0e4).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn force_is_non_negative_and_non_increasing(
            strength in 0.0f64..1e10,
            separation in 1e-8f64..1e-3,
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            let law = CohesiveLaw::new(strength, separation).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let f_lo = law.force(lo * separation * 1.5);
            let f_hi = law.force(hi * separation * 1.5);
            prop_assert!(f_lo >= 0.0 && f_hi >= 0.0);
            prop_assert!(f_hi <= f_lo + 1e-12);
        }
    }
}
