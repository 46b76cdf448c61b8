//! Equation-of-state trait and the Mie–Grüneisen implementation.

use spall_core::EosError;
use std::fmt;

/// Output of a full EOS evaluation at a `(v, e)` state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EosOutput {
    /// Pressure [Pa].
    pub pressure: f64,
    /// Partial derivative of pressure with respect to specific internal
    /// energy at constant volume [kg/m3].
    pub dp_de: f64,
    /// Sound speed [m/s].
    pub sound_speed: f64,
}

/// A pressure closure `p(v, e)` over specific volume and specific
/// internal energy.
///
/// [`pressure_and_derivative`](Self::pressure_and_derivative) is the hot
/// path inside the Newton iteration and stays infallible; the full
/// [`evaluate`](Self::evaluate) additionally produces the sound speed and
/// rejects states outside the validity domain.
pub trait EquationOfState: fmt::Debug + Send + Sync {
    /// Pressure and `dp/de|_v` at the given state.
    fn pressure_and_derivative(&self, specific_volume: f64, energy: f64) -> (f64, f64);

    /// Pressure, `dp/de|_v`, and sound speed at the given state.
    ///
    /// Fails with [`EosError::InvalidSpecificVolume`] for `v <= 0` and
    /// [`EosError::NonPhysicalSoundSpeed`] when the squared sound speed
    /// comes out non-positive.
    fn evaluate(&self, specific_volume: f64, energy: f64) -> Result<EosOutput, EosError>;
}

/// Mie–Grüneisen equation of state in the volume–energy formulation.
///
/// Pressure is referenced to the principal Hugoniot with a cubic
/// shock-velocity fit. With the compression measure `eta = 1 - rho0 * v`:
///
/// ```text
/// p_h(v)  = rho0 * c0^2 * eta / (1 - s1 eta - s2 eta^2 - s3 eta^3)^2   (eta > 0)
/// p_h(v)  = rho0 * c0^2 * eta                                          (eta <= 0)
/// e_h(v)  = e0 + p_h * eta / (2 rho0)                                  (eta > 0; e0 in tension)
/// G(v)    = (gamma0 * (1 - eta) + b * eta) / v
/// p(v, e) = p_h + G * (e - e_h),   dp/de = G
/// c^2     = v^2 * (p * dp/de - dp/dv)
/// ```
///
/// The tension branch degenerates to a linear elastic response about the
/// reference density, which is what lets spall states (large negative
/// pressures) remain inside the validity domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MieGruneisen {
    /// Bulk sound speed at the reference state [m/s].
    pub czero: f64,
    /// Linear coefficient of the shock-velocity fit.
    pub s1: f64,
    /// Quadratic coefficient of the shock-velocity fit.
    pub s2: f64,
    /// Cubic coefficient of the shock-velocity fit.
    pub s3: f64,
    /// Reference density [kg/m3].
    pub rho_zero: f64,
    /// Grüneisen coefficient at the reference state.
    pub gruneisen: f64,
    /// Volume dependence coefficient of the Grüneisen term.
    pub b: f64,
    /// Reference specific internal energy [J/kg].
    pub e_zero: f64,
}

impl MieGruneisen {
    /// Parameters for OFHC copper, the workhorse validation material.
    pub fn copper() -> Self {
        Self {
            czero: 3940.0,
            s1: 1.489,
            s2: 0.0,
            s3: 0.0,
            rho_zero: 8930.0,
            gruneisen: 2.02,
            b: 0.47,
            e_zero: 0.0,
        }
    }

    /// Hugoniot reference curve and its volume derivatives at `v`:
    /// `(p_h, dp_h/dv, e_h, de_h/dv)`.
    fn hugoniot(&self, v: f64) -> (f64, f64, f64, f64) {
        let eta = 1.0 - self.rho_zero * v;
        let k = self.rho_zero * self.czero * self.czero;
        let (p_h, dp_h_deta) = if eta > 0.0 {
            let slope = self.s1 + 2.0 * self.s2 * eta + 3.0 * self.s3 * eta * eta;
            let denom = 1.0 - self.s1 * eta - self.s2 * eta * eta - self.s3 * eta * eta * eta;
            let p_h = k * eta / (denom * denom);
            let dp_h_deta = k * (denom + 2.0 * eta * slope) / (denom * denom * denom);
            (p_h, dp_h_deta)
        } else {
            (k * eta, k)
        };
        let dp_h_dv = -self.rho_zero * dp_h_deta;
        let (e_h, de_h_dv) = if eta > 0.0 {
            let e_h = self.e_zero + p_h * eta / (2.0 * self.rho_zero);
            let de_h_dv = (dp_h_dv * eta - p_h * self.rho_zero) / (2.0 * self.rho_zero);
            (e_h, de_h_dv)
        } else {
            (self.e_zero, 0.0)
        };
        (p_h, dp_h_dv, e_h, de_h_dv)
    }

    /// Grüneisen coefficient per volume and its volume derivative at `v`.
    fn gamma_per_volume(&self, v: f64) -> (f64, f64) {
        let eta = 1.0 - self.rho_zero * v;
        let numer = self.gruneisen + eta * (self.b - self.gruneisen);
        let dnumer_dv = -self.rho_zero * (self.b - self.gruneisen);
        let g = numer / v;
        let dg_dv = (dnumer_dv * v - numer) / (v * v);
        (g, dg_dv)
    }
}

impl EquationOfState for MieGruneisen {
    fn pressure_and_derivative(&self, specific_volume: f64, energy: f64) -> (f64, f64) {
        let (p_h, _, e_h, _) = self.hugoniot(specific_volume);
        let (g, _) = self.gamma_per_volume(specific_volume);
        (p_h + g * (energy - e_h), g)
    }

    fn evaluate(&self, specific_volume: f64, energy: f64) -> Result<EosOutput, EosError> {
        if specific_volume <= 0.0 {
            return Err(EosError::InvalidSpecificVolume {
                value: specific_volume,
            });
        }
        let (p_h, dp_h_dv, e_h, de_h_dv) = self.hugoniot(specific_volume);
        let (g, dg_dv) = self.gamma_per_volume(specific_volume);
        let pressure = p_h + g * (energy - e_h);
        let dp_de = g;
        let dp_dv = dp_h_dv + dg_dv * (energy - e_h) - g * de_h_dv;
        let c_squared = specific_volume * specific_volume * (pressure * dp_de - dp_dv);
        if c_squared <= 0.0 {
            return Err(EosError::NonPhysicalSoundSpeed {
                specific_volume,
                energy,
                squared: c_squared,
            });
        }
        Ok(EosOutput {
            pressure,
            dp_de,
            sound_speed: c_squared.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn copper() -> MieGruneisen {
        MieGruneisen::copper()
    }

    // ── Reference state ─────────────────────────────────────────

    #[test]
    fn reference_state_has_zero_pressure() {
        let eos = copper();
        let v0 = 1.0 / eos.rho_zero;
        let out = eos.evaluate(v0, eos.e_zero).unwrap();
        assert!(
            out.pressure.abs() < 1.0,
            "reference pressure should vanish, got {}",
            out.pressure
        );
    }

    #[test]
    fn reference_sound_speed_is_bulk_speed() {
        let eos = copper();
        let v0 = 1.0 / eos.rho_zero;
        let out = eos.evaluate(v0, eos.e_zero).unwrap();
        assert!(
            (out.sound_speed - eos.czero).abs() / eos.czero < 1e-10,
            "expected c0 = {}, got {}",
            eos.czero,
            out.sound_speed
        );
    }

    // ── Branches ────────────────────────────────────────────────

    #[test]
    fn compression_produces_positive_pressure() {
        let eos = copper();
        let v = 0.95 / eos.rho_zero;
        let out = eos.evaluate(v, eos.e_zero).unwrap();
        assert!(out.pressure > 0.0);
    }

    #[test]
    fn tension_produces_negative_pressure() {
        let eos = copper();
        let v = 1.01 / eos.rho_zero;
        let out = eos.evaluate(v, eos.e_zero).unwrap();
        assert!(out.pressure < 0.0, "tension must pull, got {}", out.pressure);
    }

    #[test]
    fn tension_branch_is_linear_in_eta() {
        let eos = copper();
        let k = eos.rho_zero * eos.czero * eos.czero;
        let v = 1.02 / eos.rho_zero;
        let eta = 1.0 - eos.rho_zero * v;
        let (p, _) = eos.pressure_and_derivative(v, eos.e_zero);
        assert!((p - k * eta).abs() / k.abs() < 1e-12);
    }

    #[test]
    fn heating_raises_pressure() {
        let eos = copper();
        let v0 = 1.0 / eos.rho_zero;
        let cold = eos.evaluate(v0, 0.0).unwrap();
        let hot = eos.evaluate(v0, 1.0e5).unwrap();
        assert!(hot.pressure > cold.pressure);
    }

    // ── Domain errors ───────────────────────────────────────────

    #[test]
    fn rejects_non_positive_volume() {
        let eos = copper();
        assert!(matches!(
            eos.evaluate(0.0, 0.0),
            Err(EosError::InvalidSpecificVolume { .. })
        ));
        assert!(matches!(
            eos.evaluate(-1.0, 0.0),
            Err(EosError::InvalidSpecificVolume { .. })
        ));
    }

    #[test]
    fn extreme_expansion_fails_sound_speed() {
        let eos = copper();
        // Far outside the validity domain the squared sound speed turns
        // negative and the evaluation must refuse.
        let result = eos.evaluate(100.0 / eos.rho_zero, 0.0);
        assert!(matches!(
            result,
            Err(EosError::NonPhysicalSoundSpeed { .. })
        ));
    }

    // ── Derivative consistency ──────────────────────────────────

    proptest! {
        #[test]
        fn dp_de_matches_finite_difference(
            compression in 0.9f64..1.05,
            energy in 0.0f64..5.0e5,
        ) {
            let eos = copper();
            let v = compression / eos.rho_zero;
            let h = 1.0;
            let (_, dp_de) = eos.pressure_and_derivative(v, energy);
            let (p_plus, _) = eos.pressure_and_derivative(v, energy + h);
            let (p_minus, _) = eos.pressure_and_derivative(v, energy - h);
            let fd = (p_plus - p_minus) / (2.0 * h);
            // dp/de is exactly the Gruneisen term; the fit is linear in e.
            prop_assert!((dp_de - fd).abs() / dp_de.abs().max(1.0) < 1e-6);
        }

        #[test]
        fn sound_speed_is_finite_and_positive_in_domain(
            compression in 0.92f64..1.03,
            energy in 0.0f64..2.0e5,
        ) {
            let eos = copper();
            let v = compression / eos.rho_zero;
            let out = eos.evaluate(v, energy).unwrap();
            prop_assert!(out.sound_speed.is_finite());
            prop_assert!(out.sound_speed > 0.0);
        }
    }
}
