//! Non-local stress criterion: spatial mean over a fixed radius.

use crate::criterion::{CriterionError, CriterionInput, RuptureCriterion};

/// Ruptures where both the non-local stress mean and the local stress
/// exceed a critical value.
///
/// For each cell `i` the mean is taken over every base partition whose
/// center lies within `radius` of cell `i`'s center, plus every right
/// sub-partition within the radius — the latter counted only for cells
/// that are already enriched. Averaging over neighbours regularizes the
/// mesh dependence of a pointwise threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NonLocalStressCriterion {
    /// Critical stress [Pa], tension positive.
    pub critical_value: f64,
    /// Averaging radius [m].
    pub radius: f64,
}

impl NonLocalStressCriterion {
    /// Create the criterion, rejecting a non-positive or non-finite
    /// radius at construction.
    pub fn new(critical_value: f64, radius: f64) -> Result<Self, CriterionError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(CriterionError::InvalidRadius { value: radius });
        }
        Ok(Self {
            critical_value,
            radius,
        })
    }
}

impl RuptureCriterion for NonLocalStressCriterion {
    fn name(&self) -> &str {
        "non_local_stress"
    }

    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool> {
        let n = input.cells.cell_count();
        let classical = input.cells.classical();
        let mut mask = Vec::with_capacity(n);
        for i in 0..n {
            let center = input.centers[i];
            let mut sum = 0.0;
            let mut count = 0usize;
            for j in 0..n {
                if (input.centers[j] - center).abs() < self.radius {
                    sum += input.cells.stress[j];
                    count += 1;
                }
                // Only enriched cells contribute their right partition.
                if !classical[j] && (input.right_centers[j] - center).abs() < self.radius {
                    sum += input.cells.right.stress[j];
                    count += 1;
                }
            }
            // count >= 1: a cell is always within its own radius.
            let mean = sum / count as f64;
            mask.push(mean >= self.critical_value && input.cells.stress[i] >= self.critical_value);
        }
        mask
    }
}
