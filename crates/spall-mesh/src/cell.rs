//! Cell state: thermodynamic fields, sizes, masses, enrichment masks.
//!
//! All fields are whole arrays over the cell count. While a cell is
//! classical its base arrays describe the single partition; once
//! enriched, the base arrays carry the LEFT sub-partition (base `size`
//! becomes the left part size) and the [`SubcellFields`] block carries
//! the RIGHT sub-partition. The two sub-partitions evolve independently
//! until de-enrichment folds them back together.

use spall_core::{CellId, MeshError, Partition, StateField};

use crate::topology::Topology1D;

/// Initial thermodynamic state shared by every cell at mesh build time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellInit {
    /// Initial density [kg/m3].
    pub density: f64,
    /// Initial pressure [Pa].
    pub pressure: f64,
    /// Initial specific internal energy [J/kg].
    pub energy: f64,
    /// Initial sound speed [m/s], evaluated from the EOS by the caller.
    pub sound_speed: f64,
    /// Initial porosity (1.0 = fully dense).
    pub porosity: f64,
}

/// Right-hand sub-partition arrays for enriched cells.
///
/// Entries are only meaningful where the owning [`CellStore`] marks the
/// cell enriched; elsewhere they hold stale zeros/seeds and are never
/// read.
#[derive(Clone, Debug)]
pub struct SubcellFields {
    /// Density (current/new).
    pub density: StateField,
    /// Pressure (current/new).
    pub pressure: StateField,
    /// Specific internal energy (current/new).
    pub energy: StateField,
    /// Sound speed (current/new).
    pub sound_speed: StateField,
    /// Artificial viscosity (current/new).
    pub pseudo: StateField,
    /// Sub-partition size (current/new).
    pub size: StateField,
    /// Deviatoric stress s_xx (current/new).
    pub deviator: StateField,
    /// Total axial stress, refreshed each step.
    pub stress: Vec<f64>,
}

impl SubcellFields {
    fn zeroed(len: usize) -> Self {
        Self {
            density: StateField::uniform(len, 0.0),
            pressure: StateField::uniform(len, 0.0),
            energy: StateField::uniform(len, 0.0),
            sound_speed: StateField::uniform(len, 0.0),
            pseudo: StateField::uniform(len, 0.0),
            size: StateField::uniform(len, 0.0),
            deviator: StateField::uniform(len, 0.0),
            stress: vec![0.0; len],
        }
    }

    fn commit(&mut self) {
        self.density.commit();
        self.pressure.commit();
        self.energy.commit();
        self.sound_speed.commit();
        self.pseudo.commit();
        self.size.commit();
        self.deviator.commit();
    }
}

/// Whole-array cell state for the rod.
///
/// Thermodynamic fields are public data; the enrichment bookkeeping
/// (classical flags, masks, masses) is accessed through methods so the
/// state machine owns its transitions.
#[derive(Clone, Debug)]
pub struct CellStore {
    /// Density (current/new); left sub-partition once enriched.
    pub density: StateField,
    /// Pressure (current/new); left sub-partition once enriched.
    pub pressure: StateField,
    /// Specific internal energy (current/new).
    pub energy: StateField,
    /// Sound speed (current/new).
    pub sound_speed: StateField,
    /// Artificial viscosity (current/new).
    pub pseudo: StateField,
    /// Cell size (current/new); left part size once enriched.
    pub size: StateField,
    /// Deviatoric stress s_xx (current/new).
    pub deviator: StateField,
    /// Total axial stress sigma_xx = s_xx - (p + q), refreshed each step.
    pub stress: Vec<f64>,
    /// Porosity (current/new). Carried state: consumed by the porosity
    /// rupture criterion and gated by the cohesive coupling model.
    pub porosity: StateField,
    /// Right-hand sub-partition block.
    pub right: SubcellFields,

    mass: Vec<f64>,
    classical: Vec<bool>,
    already_enriched: Vec<bool>,
    to_deenrich: Vec<bool>,
    porosity_growth_allowed: Vec<bool>,
    cohesive_dissipated_energy: Vec<f64>,
}

impl CellStore {
    /// Create `cell_count` cells in the given uniform initial state.
    pub fn new(cell_count: usize, init: CellInit) -> Self {
        Self {
            density: StateField::uniform(cell_count, init.density),
            pressure: StateField::uniform(cell_count, init.pressure),
            energy: StateField::uniform(cell_count, init.energy),
            sound_speed: StateField::uniform(cell_count, init.sound_speed),
            pseudo: StateField::uniform(cell_count, 0.0),
            size: StateField::uniform(cell_count, 0.0),
            deviator: StateField::uniform(cell_count, 0.0),
            stress: vec![-init.pressure; cell_count],
            porosity: StateField::uniform(cell_count, init.porosity),
            right: SubcellFields::zeroed(cell_count),
            mass: vec![0.0; cell_count],
            classical: vec![true; cell_count],
            already_enriched: vec![false; cell_count],
            to_deenrich: vec![false; cell_count],
            porosity_growth_allowed: vec![true; cell_count],
            cohesive_dissipated_energy: vec![0.0; cell_count],
        }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.mass.len()
    }

    /// Fixed cell masses.
    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    /// Sum of cell masses.
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Per-cell classical flags.
    pub fn classical(&self) -> &[bool] {
        &self.classical
    }

    /// Whether a cell is classical.
    pub fn is_classical(&self, cell: CellId) -> bool {
        self.classical[cell.index()]
    }

    /// Set a cell's classical flag. Used only by the enrichment
    /// transitions.
    pub fn set_classical(&mut self, cell: CellId, classical: bool) {
        self.classical[cell.index()] = classical;
    }

    /// Cells that have ever been enriched (history flag, never cleared).
    pub fn already_enriched(&self) -> &[bool] {
        &self.already_enriched
    }

    /// Record that a cell has been enriched at least once.
    pub fn mark_already_enriched(&mut self, cell: CellId) {
        self.already_enriched[cell.index()] = true;
    }

    /// Ids of all currently enriched cells, in rod order.
    pub fn enriched_cells(&self) -> Vec<CellId> {
        self.classical
            .iter()
            .enumerate()
            .filter(|(_, &c)| !c)
            .map(|(i, _)| CellId(i as u32))
            .collect()
    }

    /// Flag a cell for de-enrichment at the next transition pass.
    pub fn request_deenrichment(&mut self, cell: CellId) {
        self.to_deenrich[cell.index()] = true;
    }

    /// Consume the de-enrichment mask (one-shot per step).
    pub fn take_deenrichment_mask(&mut self) -> Vec<bool> {
        std::mem::replace(&mut self.to_deenrich, vec![false; self.mass.len()])
    }

    /// Whether porosity growth is currently allowed for a cell.
    pub fn porosity_growth_allowed(&self, cell: CellId) -> bool {
        self.porosity_growth_allowed[cell.index()]
    }

    /// Gate porosity growth for a cell (set by the coupling unloading
    /// model).
    pub fn set_porosity_growth_allowed(&mut self, cell: CellId, allowed: bool) {
        self.porosity_growth_allowed[cell.index()] = allowed;
    }

    /// Cohesive energy dissipated by a crack that lived on this cell,
    /// recorded at de-enrichment (diagnostic).
    pub fn cohesive_dissipated_energy(&self) -> &[f64] {
        &self.cohesive_dissipated_energy
    }

    /// Record the cohesive energy dissipated by a removed crack.
    pub fn record_cohesive_energy(&mut self, cell: CellId, energy: f64) {
        self.cohesive_dissipated_energy[cell.index()] = energy;
    }

    /// Seed both time levels of the cell sizes from node positions.
    ///
    /// Fails on a zero or negative span (degenerate cell).
    pub fn compute_initial_sizes(
        &mut self,
        topology: &Topology1D,
        positions: &[f64],
    ) -> Result<(), MeshError> {
        for cell in topology.cells() {
            let [left, right] = topology.nodes_of_cell(cell);
            let span = positions[right.index()] - positions[left.index()];
            if span <= 0.0 {
                return Err(MeshError::DegenerateCell {
                    cell,
                    partition: Partition::Whole,
                    size: span,
                });
            }
            self.size.set_both(cell.index(), span);
        }
        Ok(())
    }

    /// Fix cell masses from the current density and size: `m = rho * S * l`.
    ///
    /// Called once after [`compute_initial_sizes`](Self::compute_initial_sizes);
    /// masses never change afterwards.
    pub fn compute_masses(&mut self, section: f64) {
        for i in 0..self.mass.len() {
            self.mass[i] = self.density.current()[i] * section * self.size.current()[i];
        }
    }

    /// New sizes for classical cells from the new node positions.
    ///
    /// Enriched cells are skipped; their sub-partition sizes follow the
    /// crack-face kinematics and are written by the engine through
    /// [`set_enriched_sizes`](Self::set_enriched_sizes).
    pub fn compute_new_sizes_classical(
        &mut self,
        topology: &Topology1D,
        new_positions: &[f64],
    ) -> Result<(), MeshError> {
        for cell in topology.cells() {
            if !self.classical[cell.index()] {
                continue;
            }
            let [left, right] = topology.nodes_of_cell(cell);
            let span = new_positions[right.index()] - new_positions[left.index()];
            if span <= 0.0 {
                return Err(MeshError::DegenerateCell {
                    cell,
                    partition: Partition::Whole,
                    size: span,
                });
            }
            self.size.new_values_mut()[cell.index()] = span;
        }
        Ok(())
    }

    /// Write the new left/right sub-partition sizes of an enriched cell.
    pub fn set_enriched_sizes(
        &mut self,
        cell: CellId,
        left_new: f64,
        right_new: f64,
    ) -> Result<(), MeshError> {
        if left_new <= 0.0 {
            return Err(MeshError::DegenerateCell {
                cell,
                partition: Partition::Left,
                size: left_new,
            });
        }
        if right_new <= 0.0 {
            return Err(MeshError::DegenerateCell {
                cell,
                partition: Partition::Right,
                size: right_new,
            });
        }
        self.size.new_values_mut()[cell.index()] = left_new;
        self.right.size.new_values_mut()[cell.index()] = right_new;
        Ok(())
    }

    /// Seed the right sub-partition of a freshly enriched cell from the
    /// whole-cell values, at both time levels.
    ///
    /// Sizes are not touched here; the enrichment transition splits them
    /// by the rupture fraction separately.
    pub fn seed_right_from_base(&mut self, cell: CellId) {
        let i = cell.index();
        mirror(&mut self.right.density, self.density.current()[i], self.density.new_values()[i], i);
        mirror(
            &mut self.right.pressure,
            self.pressure.current()[i],
            self.pressure.new_values()[i],
            i,
        );
        mirror(&mut self.right.energy, self.energy.current()[i], self.energy.new_values()[i], i);
        mirror(
            &mut self.right.sound_speed,
            self.sound_speed.current()[i],
            self.sound_speed.new_values()[i],
            i,
        );
        mirror(&mut self.right.pseudo, self.pseudo.current()[i], self.pseudo.new_values()[i], i);
        mirror(
            &mut self.right.deviator,
            self.deviator.current()[i],
            self.deviator.new_values()[i],
            i,
        );
        self.right.stress[i] = self.stress[i];
    }

    /// Density update `rho_new = rho_old * size_old / size_new` for every
    /// partition. Mass is conserved exactly by construction.
    pub fn compute_new_densities(&mut self) {
        let n = self.mass.len();
        for i in 0..n {
            let rho = self.density.current()[i] * self.size.current()[i]
                / self.size.new_values()[i];
            self.density.new_values_mut()[i] = rho;
            if !self.classical[i] {
                let rho_r = self.right.density.current()[i] * self.right.size.current()[i]
                    / self.right.size.new_values()[i];
                self.right.density.new_values_mut()[i] = rho_r;
            }
        }
    }

    /// Pseudo-viscosity update for every partition.
    ///
    /// `a` and `b` are the quadratic and linear coefficients.
    pub fn compute_new_pseudo(&mut self, dt: f64, a: f64, b: f64) {
        let n = self.mass.len();
        for i in 0..n {
            let q = compute_pseudo(
                dt,
                self.density.current()[i],
                self.density.new_values()[i],
                self.size.new_values()[i],
                self.sound_speed.current()[i],
                a,
                b,
            );
            self.pseudo.new_values_mut()[i] = q;
            if !self.classical[i] {
                let q_r = compute_pseudo(
                    dt,
                    self.right.density.current()[i],
                    self.right.density.new_values()[i],
                    self.right.size.new_values()[i],
                    self.right.sound_speed.current()[i],
                    a,
                    b,
                );
                self.right.pseudo.new_values_mut()[i] = q_r;
            }
        }
    }

    /// Refresh the total axial stress from the freshly solved fields:
    /// `sigma_xx = s_xx - (p_new + q_new)` per partition.
    pub fn update_total_stress(&mut self) {
        let n = self.mass.len();
        for i in 0..n {
            self.stress[i] = self.deviator.new_values()[i]
                - (self.pressure.new_values()[i] + self.pseudo.new_values()[i]);
            if !self.classical[i] {
                self.right.stress[i] = self.right.deviator.new_values()[i]
                    - (self.right.pressure.new_values()[i] + self.right.pseudo.new_values()[i]);
            }
        }
    }

    /// Smallest critical timestep over every partition.
    pub fn compute_critical_dt(&self, cfl: f64) -> f64 {
        let n = self.mass.len();
        let mut dt_min = f64::INFINITY;
        for i in 0..n {
            let dt = critical_time_step(
                cfl,
                self.size.new_values()[i],
                self.density.new_values()[i],
                self.sound_speed.new_values()[i],
                self.pseudo.new_values()[i],
            );
            dt_min = dt_min.min(dt);
            if !self.classical[i] {
                let dt_r = critical_time_step(
                    cfl,
                    self.right.size.new_values()[i],
                    self.right.density.new_values()[i],
                    self.right.sound_speed.new_values()[i],
                    self.right.pseudo.new_values()[i],
                );
                dt_min = dt_min.min(dt_r);
            }
        }
        dt_min
    }

    /// Publish every new field (base and right partitions) as current.
    pub fn commit(&mut self) {
        self.density.commit();
        self.pressure.commit();
        self.energy.commit();
        self.sound_speed.commit();
        self.pseudo.commit();
        self.size.commit();
        self.deviator.commit();
        self.porosity.commit();
        self.right.commit();
    }
}

/// Write one entry of a state field at both time levels.
fn mirror(dst: &mut StateField, current: f64, new: f64, i: usize) {
    dst.current_mut()[i] = current;
    dst.new_values_mut()[i] = new;
}

/// Von Neumann–Richtmyer pseudo-viscosity for one partition.
///
/// Quadratic + linear form driven by the specific-volume rate; active in
/// compression only:
///
/// ```text
/// q = rho_mid * (a^2 * l^2 * (vdot/v_mid)^2 + b * l * c * |vdot|/v_mid)   if vdot < 0
/// q = 0                                                                    otherwise
/// ```
pub fn compute_pseudo(
    dt: f64,
    rho_old: f64,
    rho_new: f64,
    size_new: f64,
    sound_speed: f64,
    a: f64,
    b: f64,
) -> f64 {
    let v_old = 1.0 / rho_old;
    let v_new = 1.0 / rho_new;
    let v_mid = 0.5 * (v_old + v_new);
    let v_dot = (v_new - v_old) / dt;
    if v_dot >= 0.0 {
        return 0.0;
    }
    let rate = v_dot / v_mid;
    (a * a * size_new * size_new * rate * rate + b * size_new * sound_speed * rate.abs()) / v_mid
}

/// CFL-critical timestep for one partition:
/// `dt = cfl * l / (c + 2|q| / (rho * c))`.
///
/// The pseudo term widens the effective wave speed under strong
/// compression, tightening the bound where shocks live.
pub fn critical_time_step(cfl: f64, size: f64, density: f64, sound_speed: f64, pseudo: f64) -> f64 {
    let wave_speed = sound_speed + 2.0 * pseudo.abs() / (density * sound_speed);
    cfl * size / wave_speed
}
