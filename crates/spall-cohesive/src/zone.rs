//! The four-branch cohesive zone evaluation.

use crate::discontinuity::Discontinuity;
use crate::unloading::{PorosityGate, UnloadingModel, UnloadingResponse};

/// Result of one cohesive evaluation: the traction plus the side-effect
/// requests surfaced by the unloading sub-model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CohesiveOutcome {
    /// Cohesive traction across the crack [Pa].
    pub force: f64,
    /// Porosity gate for the owning cell, if driven this step.
    pub porosity_gate: Option<PorosityGate>,
    /// Whether the owning cell should be de-enriched.
    pub request_deenrichment: bool,
}

/// Cohesive zone model: the loading law lives on each discontinuity;
/// the unloading sub-model is shared simulation-wide.
#[derive(Debug)]
pub struct CohesiveZoneModel {
    unloading: Box<dyn UnloadingModel>,
}

impl CohesiveZoneModel {
    /// Build the model around an unloading sub-model.
    pub fn new(unloading: Box<dyn UnloadingModel>) -> Self {
        Self { unloading }
    }

    /// Compute the cohesive traction for a discontinuity's new opening
    /// and update its damage/energy bookkeeping.
    ///
    /// Four branches against `critical_separation` and
    /// `history_max_opening`:
    ///
    /// 1. closed and never near failure: no traction;
    /// 2. partially reopened below the historical maximum: the unloading
    ///    sub-model answers;
    /// 3. monotonic loading: the traction–separation law answers and the
    ///    history (max opening, min force, damage) advances;
    /// 4. at or beyond critical separation: fully failed, traction zero,
    ///    damage pinned at one.
    ///
    /// The dissipated-energy estimate is `strength * history_max / 2` in
    /// branches 1–3 and saturates at `strength * separation / 2` in
    /// branch 4.
    pub fn compute_force(&self, disc: &mut Discontinuity, new_opening: f64) -> CohesiveOutcome {
        let separation = disc.law.critical_separation;
        let strength = disc.law.critical_strength;

        if new_opening <= 0.0 && disc.history_max_opening < separation {
            disc.dissipated_energy.new = strength * disc.history_max_opening / 2.0;
            CohesiveOutcome {
                force: 0.0,
                porosity_gate: None,
                request_deenrichment: false,
            }
        } else if 0.0 < new_opening
            && new_opening < disc.history_max_opening
            && disc.history_max_opening < separation
        {
            let UnloadingResponse {
                force,
                porosity_gate,
                request_deenrichment,
            } = self.unloading.unloading_force(disc, new_opening);
            disc.dissipated_energy.new = strength * disc.history_max_opening / 2.0;
            CohesiveOutcome {
                force,
                porosity_gate,
                request_deenrichment,
            }
        } else if disc.history_max_opening <= new_opening && new_opening < separation {
            let force = disc.law.force(new_opening);
            disc.history_max_opening = disc.history_max_opening.abs().max(new_opening.abs());
            disc.history_min_force = disc.law.force(disc.history_max_opening);
            disc.damage.new = new_opening / separation;
            disc.dissipated_energy.new = strength * disc.history_max_opening / 2.0;
            CohesiveOutcome {
                force,
                porosity_gate: None,
                request_deenrichment: false,
            }
        } else {
            disc.damage.new = 1.0;
            disc.history_max_opening = disc.history_max_opening.abs().max(new_opening.abs());
            disc.history_min_force = 0.0;
            disc.dissipated_energy.new = strength * separation / 2.0;
            CohesiveOutcome {
                force: 0.0,
                porosity_gate: None,
                request_deenrichment: false,
            }
        }
    }
}
