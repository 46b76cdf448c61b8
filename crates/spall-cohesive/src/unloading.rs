//! Unloading/reloading sub-models for partially opened cracks.

use spall_core::CohesiveError;
use std::fmt;

use crate::discontinuity::Discontinuity;

/// Porosity growth gate requested by the coupling model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PorosityGate {
    /// Porosity may grow in the owning cell.
    Allow,
    /// Porosity growth is blocked in the owning cell.
    Block,
}

/// What an unloading evaluation asks of the engine.
///
/// Plain sub-models return a force only; the coupling model additionally
/// gates porosity growth and may request de-enrichment of the owning
/// cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnloadingResponse {
    /// Cohesive traction [Pa].
    pub force: f64,
    /// Porosity gate for the owning cell, if the model drives one.
    pub porosity_gate: Option<PorosityGate>,
    /// Whether the owning cell should be de-enriched this step.
    pub request_deenrichment: bool,
}

impl UnloadingResponse {
    fn force_only(force: f64) -> Self {
        Self {
            force,
            porosity_gate: None,
            request_deenrichment: false,
        }
    }
}

/// Traction on the unloading/reloading path, evaluated when the new
/// opening has fallen below the historical maximum.
pub trait UnloadingModel: fmt::Debug + Send {
    /// Model name for error reporting.
    fn name(&self) -> &str;

    /// Traction (and side-effect requests) at the given opening.
    ///
    /// Called only on the unloading branch: `0 < opening <
    /// history_max_opening < critical_separation`, which guarantees
    /// `history_max_opening > 0`.
    fn unloading_force(&self, disc: &Discontinuity, opening: f64) -> UnloadingResponse;
}

/// Linear return toward zero with a fixed slope.
///
/// `f = f_min - slope * (delta_max - delta)`, floored at zero. At
/// `delta = delta_max` this meets the loading law exactly
/// (`f_min = law(delta_max)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantStiffnessUnloading {
    /// Unloading stiffness [Pa/m].
    pub slope: f64,
}

impl UnloadingModel for ConstantStiffnessUnloading {
    fn name(&self) -> &str {
        "constant_stiffness"
    }

    fn unloading_force(&self, disc: &Discontinuity, opening: f64) -> UnloadingResponse {
        let force =
            disc.history_min_force - self.slope * (disc.history_max_opening - opening);
        UnloadingResponse::force_only(force.max(0.0))
    }
}

/// Secant unloading toward the origin.
///
/// `f = f_min * delta / delta_max`: the unloading stiffness degrades
/// with accumulated damage, and the path meets the loading law at
/// `delta = delta_max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LossOfStiffnessUnloading;

impl UnloadingModel for LossOfStiffnessUnloading {
    fn name(&self) -> &str {
        "loss_of_stiffness"
    }

    fn unloading_force(&self, disc: &Discontinuity, opening: f64) -> UnloadingResponse {
        UnloadingResponse::force_only(
            disc.history_min_force * opening / disc.history_max_opening,
        )
    }
}

/// Porosity-aware unloading: routes to an inner sub-model and drives the
/// porosity gate and the de-enrichment request from two opening
/// thresholds.
///
/// Above `coupling_unload_criterion` porosity growth is blocked; below
/// it growth is allowed; below `porosity_unload_criterion` the model
/// additionally requests de-enrichment once the crack has dissipated its
/// energy target.
#[derive(Debug)]
pub struct CouplingUnloading {
    /// Opening above which porosity growth is blocked [m].
    pub coupling_unload_criterion: f64,
    /// Opening below which de-enrichment is considered [m].
    pub porosity_unload_criterion: f64,
    inner: Box<dyn UnloadingModel>,
}

impl CouplingUnloading {
    /// Build the coupling model around an inner unloading sub-model.
    ///
    /// Rejects thresholds ordered the wrong way
    /// (`porosity > coupling`).
    pub fn new(
        coupling_unload_criterion: f64,
        porosity_unload_criterion: f64,
        inner: Box<dyn UnloadingModel>,
    ) -> Result<Self, CohesiveError> {
        if porosity_unload_criterion > coupling_unload_criterion {
            return Err(CohesiveError::InvalidUnloadingThresholds {
                coupling: coupling_unload_criterion,
                porosity: porosity_unload_criterion,
            });
        }
        Ok(Self {
            coupling_unload_criterion,
            porosity_unload_criterion,
            inner,
        })
    }
}

impl UnloadingModel for CouplingUnloading {
    fn name(&self) -> &str {
        "coupling"
    }

    fn unloading_force(&self, disc: &Discontinuity, opening: f64) -> UnloadingResponse {
        let inner = self.inner.unloading_force(disc, opening);
        if opening > self.coupling_unload_criterion {
            UnloadingResponse {
                porosity_gate: Some(PorosityGate::Block),
                ..inner
            }
        } else if opening > self.porosity_unload_criterion {
            UnloadingResponse {
                porosity_gate: Some(PorosityGate::Allow),
                ..inner
            }
        } else {
            UnloadingResponse {
                porosity_gate: Some(PorosityGate::Allow),
                request_deenrichment: disc.dissipated_energy.new >= disc.energy_target,
                ..inner
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law::CohesiveLaw;
    use spall_core::{CellId, NodeId};

    fn disc_with_history(history_max: f64) -> Discontinuity {
        let law = CohesiveLaw::new(1.0e9, 1.0e-5).unwrap();
        let mut d = Discontinuity::new(
            CellId(0),
            NodeId(0),
            NodeId(1),
            0.5,
            law,
            law.max_dissipated_energy(),
            1.0,
            1.0,
        );
        d.history_max_opening = history_max;
        d.history_min_force = law.force(history_max);
        d
    }

    // ── Continuity with the loading law ─────────────────────────

    #[test]
    fn constant_stiffness_meets_loading_law_at_history_max() {
        let d = disc_with_history(4.0e-6);
        let model = ConstantStiffnessUnloading { slope: 1.0e14 };
        let at_max = model.unloading_force(&d, d.history_max_opening).force;
        assert!((at_max - d.law.force(d.history_max_opening)).abs() < 1e-6);
    }

    #[test]
    fn loss_of_stiffness_meets_loading_law_at_history_max() {
        let d = disc_with_history(4.0e-6);
        let model = LossOfStiffnessUnloading;
        let at_max = model.unloading_force(&d, d.history_max_opening).force;
        assert!((at_max - d.law.force(d.history_max_opening)).abs() < 1e-6);
    }

    // ── Shapes ──────────────────────────────────────────────────

    #[test]
    fn constant_stiffness_floors_at_zero() {
        let d = disc_with_history(4.0e-6);
        let model = ConstantStiffnessUnloading { slope: 1.0e15 };
        let f = model.unloading_force(&d, 1.0e-7).force;
        assert_eq!(f, 0.0);
    }

    #[test]
    fn loss_of_stiffness_passes_through_origin() {
        let d = disc_with_history(4.0e-6);
        let model = LossOfStiffnessUnloading;
        let f_half = model.unloading_force(&d, 2.0e-6).force;
        assert!((f_half - d.history_min_force / 2.0).abs() < 1e-6);
        let f_zero = model.unloading_force(&d, 1.0e-12).force;
        assert!(f_zero < d.history_min_force * 1e-5);
    }

    // ── Coupling routing ────────────────────────────────────────

    #[test]
    fn coupling_rejects_misordered_thresholds() {
        let err = CouplingUnloading::new(1.0e-6, 2.0e-6, Box::new(LossOfStiffnessUnloading));
        assert!(matches!(
            err,
            Err(CohesiveError::InvalidUnloadingThresholds { .. })
        ));
    }

    #[test]
    fn coupling_blocks_porosity_above_upper_threshold() {
        let d = disc_with_history(4.0e-6);
        let model =
            CouplingUnloading::new(2.0e-6, 1.0e-6, Box::new(LossOfStiffnessUnloading)).unwrap();
        let r = model.unloading_force(&d, 3.0e-6);
        assert_eq!(r.porosity_gate, Some(PorosityGate::Block));
        assert!(!r.request_deenrichment);
    }

    #[test]
    fn coupling_allows_porosity_between_thresholds() {
        let d = disc_with_history(4.0e-6);
        let model =
            CouplingUnloading::new(2.0e-6, 1.0e-6, Box::new(LossOfStiffnessUnloading)).unwrap();
        let r = model.unloading_force(&d, 1.5e-6);
        assert_eq!(r.porosity_gate, Some(PorosityGate::Allow));
        assert!(!r.request_deenrichment);
    }

    #[test]
    fn coupling_requests_deenrichment_once_energy_target_met() {
        let mut d = disc_with_history(4.0e-6);
        let model =
            CouplingUnloading::new(2.0e-6, 1.0e-6, Box::new(LossOfStiffnessUnloading)).unwrap();

        // Below the porosity threshold but short of the energy target.
        d.dissipated_energy.new = d.energy_target * 0.5;
        let r = model.unloading_force(&d, 0.5e-6);
        assert!(!r.request_deenrichment);

        // Target reached: the owning cell must be flagged.
        d.dissipated_energy.new = d.energy_target;
        let r = model.unloading_force(&d, 0.5e-6);
        assert!(r.request_deenrichment);
        assert_eq!(r.porosity_gate, Some(PorosityGate::Allow));
    }

    #[test]
    fn coupling_delegates_force_to_inner_model() {
        let d = disc_with_history(4.0e-6);
        let inner = LossOfStiffnessUnloading;
        let model = CouplingUnloading::new(2.0e-6, 1.0e-6, Box::new(inner)).unwrap();
        let opening = 1.5e-6;
        assert_eq!(
            model.unloading_force(&d, opening).force,
            inner.unloading_force(&d, opening).force
        );
    }
}
