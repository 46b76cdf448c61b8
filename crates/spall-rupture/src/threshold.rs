//! Scalar threshold criteria and the single-rupture gate.

use spall_core::CellId;

use crate::criterion::{CriterionInput, RuptureCriterion};

/// Ruptures where the axial stress reaches a tensile limit.
///
/// Also used as the "traction-only" gate of the double criterion: stress
/// must be tensile (positive) past the limit for rupture to count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaximalStressCriterion {
    /// Stress limit [Pa], tension positive.
    pub limit: f64,
}

impl MaximalStressCriterion {
    /// Create the criterion with the given tensile stress limit.
    pub fn new(limit: f64) -> Self {
        Self { limit }
    }
}

impl RuptureCriterion for MaximalStressCriterion {
    fn name(&self) -> &str {
        "maximal_stress"
    }

    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool> {
        input
            .cells
            .stress
            .iter()
            .map(|&s| s >= self.limit)
            .collect()
    }
}

/// Ruptures where the new pressure drops below a (negative) limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimumPressureCriterion {
    /// Pressure limit [Pa]; rupture at or below it.
    pub limit: f64,
}

impl MinimumPressureCriterion {
    /// Create the criterion with the given pressure floor.
    pub fn new(limit: f64) -> Self {
        Self { limit }
    }
}

impl RuptureCriterion for MinimumPressureCriterion {
    fn name(&self) -> &str {
        "minimum_pressure"
    }

    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool> {
        input
            .cells
            .pressure
            .new_values()
            .iter()
            .map(|&p| p <= self.limit)
            .collect()
    }
}

/// Ruptures where porosity reaches a limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PorosityCriterion {
    /// Porosity limit; rupture at or above it.
    pub limit: f64,
}

impl PorosityCriterion {
    /// Create the criterion with the given porosity limit.
    pub fn new(limit: f64) -> Self {
        Self { limit }
    }
}

impl RuptureCriterion for PorosityCriterion {
    fn name(&self) -> &str {
        "porosity"
    }

    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool> {
        input
            .cells
            .porosity
            .new_values()
            .iter()
            .map(|&a| a >= self.limit)
            .collect()
    }
}

/// Restricts rupture to one designated cell.
///
/// The "single rupture allowed" gate: only the reference cell (typically
/// the rod mid-plane, derived from the cell count) may rupture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfRodComparisonCriterion {
    /// The only cell allowed to rupture.
    pub reference: CellId,
}

impl HalfRodComparisonCriterion {
    /// Gate rupture to an explicit reference cell.
    pub fn new(reference: CellId) -> Self {
        Self { reference }
    }

    /// Gate rupture to the rod mid-plane for the given cell count.
    pub fn mid_plane(cell_count: usize) -> Self {
        Self {
            reference: CellId((cell_count / 2) as u32),
        }
    }
}

impl RuptureCriterion for HalfRodComparisonCriterion {
    fn name(&self) -> &str {
        "half_rod_comparison"
    }

    fn evaluate(&self, input: &CriterionInput<'_>) -> Vec<bool> {
        (0..input.cells.cell_count())
            .map(|i| i == self.reference.index())
            .collect()
    }
}
