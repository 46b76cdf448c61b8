//! Compound (double) criterion: gated threshold composition.

use crate::criterion::{CriterionError, CriterionInput, RuptureCriterion};
use crate::threshold::{HalfRodComparisonCriterion, MaximalStressCriterion};

/// Logical AND of a gated arm and a second threshold criterion.
///
/// The gate arm combines two optional constraints:
/// - *traction only*: stress must be tensile past a minimum,
/// - *single rupture*: only the designated reference cell may rupture,
///
/// ANDed together, then ORed with the negation of the already-enriched
/// history flag — so the constraints bind cells that have already
/// ruptured once, while fresh cells pass the gate on the second
/// criterion alone.
#[derive(Debug)]
pub struct DoubleCriterion {
    traction: Option<MaximalStressCriterion>,
    single: Option<HalfRodComparisonCriterion>,
    second: Box<dyn RuptureCriterion>,
}

impl DoubleCriterion {
    /// Start building a double criterion.
    pub fn builder() -> DoubleCriterionBuilder {
        DoubleCriterionBuilder {
            traction: None,
            single: None,
            second: None,
        }
    }
}

/// Builder for [`DoubleCriterion`].
///
/// The second criterion is required; both gates are optional.
#[derive(Debug)]
pub struct DoubleCriterionBuilder {
    traction: Option<MaximalStressCriterion>,
    single: Option<HalfRodComparisonCriterion>,
    second: Option<Box<dyn RuptureCriterion>>,
}

impl DoubleCriterionBuilder {
    /// Require tensile stress past `minimum_traction_stress`.
    pub fn traction_only(mut self, minimum_traction_stress: f64) -> Self {
        self.traction = Some(MaximalStressCriterion::new(minimum_traction_stress));
        self
    }

    /// Permit rupture only in the designated reference cell.
    pub fn single_rupture(mut self, gate: HalfRodComparisonCriterion) -> Self {
        self.single = Some(gate);
        self
    }

    /// Set the second (threshold) criterion.
    pub fn second(mut self, criterion: Box<dyn RuptureCriterion>) -> Self {
        self.second = Some(criterion);
        self
    }

    /// Build, rejecting a missing second criterion.
    pub fn build(self) -> Result<DoubleCriterion, CriterionError> {
        let second = self.second.ok_or(CriterionError::MissingSecondCriterion)?;
        Ok(DoubleCriterion {
            traction: self.traction,
            single: self.single,
            second,
        })
    }
}

impl RuptureCriterion for DoubleCriterion {
    fn name(&self) -> &str {
        "double"
    }

    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool> {
        let n = input.cells.cell_count();
        let traction_mask = self
            .traction
            .map(|c| c.evaluate(input))
            .unwrap_or_else(|| vec![true; n]);
        let single_mask = self
            .single
            .map(|c| c.evaluate(input))
            .unwrap_or_else(|| vec![true; n]);
        let second_mask = self.second.evaluate(input);
        let already = input.cells.already_enriched();

        (0..n)
            .map(|i| {
                let gated = traction_mask[i] && single_mask[i];
                (gated || !already[i]) && second_mask[i]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::MinimumPressureCriterion;
    use spall_core::CellId;
    use spall_mesh::{CellInit, CellStore};

    fn store() -> CellStore {
        CellStore::new(
            4,
            CellInit {
                density: 8930.0,
                pressure: 0.0,
                energy: 0.0,
                sound_speed: 3940.0,
                porosity: 1.0,
            },
        )
    }

    fn input<'a>(cells: &'a CellStore, centers: &'a [f64]) -> CriterionInput<'a> {
        CriterionInput {
            cells,
            centers,
            right_centers: centers,
        }
    }

    #[test]
    fn build_requires_second_criterion() {
        let err = DoubleCriterion::builder().traction_only(0.0).build();
        assert!(matches!(err, Err(CriterionError::MissingSecondCriterion)));
    }

    #[test]
    fn second_criterion_alone_drives_fresh_cells() {
        let mut cells = store();
        cells.pressure.new_values_mut()[1] = -8.0e9;
        let crit = DoubleCriterion::builder()
            .second(Box::new(MinimumPressureCriterion::new(-7.0e9)))
            .build()
            .unwrap();
        let centers = [0.5, 1.5, 2.5, 3.5];
        assert_eq!(
            crit.evaluate(&input(&cells, &centers)),
            vec![false, true, false, false]
        );
    }

    #[test]
    fn gates_bind_already_enriched_cells() {
        let mut cells = store();
        // Both cells pass the second criterion; cell 2 has ruptured before.
        cells.pressure.new_values_mut()[1] = -8.0e9;
        cells.pressure.new_values_mut()[2] = -8.0e9;
        cells.mark_already_enriched(CellId(2));
        // Compressive stress everywhere: the traction gate fails.
        for s in &mut cells.stress {
            *s = -1.0e9;
        }
        let crit = DoubleCriterion::builder()
            .traction_only(0.0)
            .second(Box::new(MinimumPressureCriterion::new(-7.0e9)))
            .build()
            .unwrap();
        let centers = [0.5, 1.5, 2.5, 3.5];
        // Fresh cell 1 passes (gate bypassed via !already_enriched);
        // previously enriched cell 2 is held back by the traction gate.
        assert_eq!(
            crit.evaluate(&input(&cells, &centers)),
            vec![false, true, false, false]
        );
    }

    #[test]
    fn single_rupture_gate_composes() {
        let mut cells = store();
        for p in cells.pressure.new_values_mut() {
            *p = -8.0e9;
        }
        for s in &mut cells.stress {
            *s = 1.0e9;
        }
        for i in 0..4 {
            cells.mark_already_enriched(CellId(i));
        }
        let crit = DoubleCriterion::builder()
            .traction_only(0.0)
            .single_rupture(HalfRodComparisonCriterion::mid_plane(4))
            .second(Box::new(MinimumPressureCriterion::new(-7.0e9)))
            .build()
            .unwrap();
        let centers = [0.5, 1.5, 2.5, 3.5];
        // All cells pass traction + second, but only the mid-plane cell
        // passes the single-rupture gate (history flag set everywhere).
        assert_eq!(
            crit.evaluate(&input(&cells, &centers)),
            vec![false, false, true, false]
        );
    }
}
