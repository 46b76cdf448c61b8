//! The enrichment state machine: CLASSICAL -> ENRICHED -> CLASSICAL.
//!
//! Both transitions are atomic within a step and consume their masks
//! one-shot. Attempting either transition from the wrong state is a
//! fatal [`TransitionError`] — never silently ignored.

use spall_cohesive::Discontinuity;
use spall_core::{CellId, DiscontinuityId, MeshError, Partition, StepError, TransitionError};

use crate::simulation::Simulation;

impl Simulation {
    /// Enrich a classical cell: split it at the configured rupture
    /// fraction into two sub-partitions joined by a fresh cohesive
    /// discontinuity.
    ///
    /// Fails with [`TransitionError::AlreadyEnriched`] if the cell is
    /// already enriched.
    pub fn enrich_cell(&mut self, cell: CellId) -> Result<DiscontinuityId, StepError> {
        if !self.cells.is_classical(cell) {
            return Err(TransitionError::AlreadyEnriched { cell }.into());
        }
        let i = cell.index();
        let [in_node, out_node] = self.topology.nodes_of_cell(cell);
        let fraction = self.rupture_position;

        // The cohesive law is built from the local stress at the moment
        // of rupture and frozen for the crack's lifetime.
        let (law, energy_target) = self
            .calculation
            .build_law(self.cells.stress[i])
            .map_err(|source| StepError::Cohesive { cell, source })?;

        let cell_mass = self.cells.masses()[i];
        let left_mass = fraction * cell_mass;
        let right_mass = (1.0 - fraction) * cell_mass;

        self.cells.set_classical(cell, false);
        self.cells.mark_already_enriched(cell);
        self.nodes.set_classical(in_node, false);
        self.nodes.set_classical(out_node, false);

        // Each boundary node keeps half of its adjacent sub-partition's
        // mass; the crack faces receive the remainder. Total mass is
        // conserved exactly.
        self.nodes.adjust_mass(in_node, -right_mass / 2.0);
        self.nodes.adjust_mass(out_node, -left_mass / 2.0);

        // The right partition starts from the whole-cell thermodynamic
        // state; the sizes split by the rupture fraction at both time
        // levels so the opening is exactly zero at creation.
        self.cells.seed_right_from_base(cell);
        let size_current = self.cells.size.current()[i];
        let size_new = self.cells.size.new_values()[i];
        self.cells.size.current_mut()[i] = fraction * size_current;
        self.cells.size.new_values_mut()[i] = fraction * size_new;
        self.cells.right.size.current_mut()[i] = (1.0 - fraction) * size_current;
        self.cells.right.size.new_values_mut()[i] = (1.0 - fraction) * size_new;

        let crack_current = self.nodes.positions()[in_node.index()] + fraction * size_current;
        let crack_new = self.nodes.new_positions()[in_node.index()] + fraction * size_new;
        let u = self.nodes.new_velocities();
        let crack_velocity =
            (1.0 - fraction) * u[in_node.index()] + fraction * u[out_node.index()];

        let mut disc = Discontinuity::new(
            cell,
            in_node,
            out_node,
            fraction,
            law,
            energy_target,
            left_mass,
            right_mass,
        );
        disc.initialize_faces(crack_current, crack_new, crack_velocity);
        self.metrics.enrichment_events += 1;
        Ok(self.registry.register(disc))
    }

    /// De-enrich an enriched cell: fold the two sub-partitions and the
    /// crack opening back into one classical cell and destroy its
    /// discontinuity.
    ///
    /// Fails with [`TransitionError::NotEnriched`] if the cell is
    /// classical.
    pub fn deenrich_cell(&mut self, cell: CellId) -> Result<(), StepError> {
        if self.cells.is_classical(cell) {
            return Err(TransitionError::NotEnriched { cell }.into());
        }
        let (id, _) = self
            .registry
            .find_by_cell(cell)
            .expect("enriched cell owns a discontinuity");
        let disc = self
            .registry
            .remove(id)
            .expect("handle resolved just above");
        let i = cell.index();

        // Fold the geometry: combined size = left + right + opening.
        let size_new = self.cells.size.new_values()[i]
            + self.cells.right.size.new_values()[i]
            + disc.opening.new;
        let size_current = self.cells.size.current()[i]
            + self.cells.right.size.current()[i]
            + disc.opening.current;
        if size_new <= 0.0 || size_current <= 0.0 {
            return Err(MeshError::DegenerateCell {
                cell,
                partition: Partition::Whole,
                size: size_new.min(size_current),
            }
            .into());
        }
        self.cells.size.current_mut()[i] = size_current;
        self.cells.size.new_values_mut()[i] = size_new;

        // Density from the conserved cell mass over the folded volume.
        let cell_mass = self.cells.masses()[i];
        let rho_current = cell_mass / (self.section * size_current);
        let rho_new = cell_mass / (self.section * size_new);
        self.cells.density.current_mut()[i] = rho_current;
        self.cells.density.new_values_mut()[i] = rho_new;

        // Mass-weighted fold of the specific and deviatoric state.
        let w_left = disc.left_mass / cell_mass;
        let w_right = disc.right_mass / cell_mass;
        let energy_current =
            w_left * self.cells.energy.current()[i] + w_right * self.cells.right.energy.current()[i];
        let energy_new = w_left * self.cells.energy.new_values()[i]
            + w_right * self.cells.right.energy.new_values()[i];
        self.cells.energy.current_mut()[i] = energy_current;
        self.cells.energy.new_values_mut()[i] = energy_new;
        let pseudo_current =
            w_left * self.cells.pseudo.current()[i] + w_right * self.cells.right.pseudo.current()[i];
        let pseudo_new = w_left * self.cells.pseudo.new_values()[i]
            + w_right * self.cells.right.pseudo.new_values()[i];
        self.cells.pseudo.current_mut()[i] = pseudo_current;
        self.cells.pseudo.new_values_mut()[i] = pseudo_new;
        let deviator_current = w_left * self.cells.deviator.current()[i]
            + w_right * self.cells.right.deviator.current()[i];
        let deviator_new = w_left * self.cells.deviator.new_values()[i]
            + w_right * self.cells.right.deviator.new_values()[i];
        self.cells.deviator.current_mut()[i] = deviator_current;
        self.cells.deviator.new_values_mut()[i] = deviator_new;

        // Pressure and sound speed of the restored single partition come
        // from the EOS, not from averaging.
        let restored_new = self
            .eos
            .evaluate(1.0 / rho_new, energy_new)
            .map_err(|source| StepError::Eos {
                cell,
                partition: Partition::Whole,
                source,
            })?;
        self.cells.pressure.new_values_mut()[i] = restored_new.pressure;
        self.cells.sound_speed.new_values_mut()[i] = restored_new.sound_speed;
        let restored_current = self
            .eos
            .evaluate(1.0 / rho_current, energy_current)
            .map_err(|source| StepError::Eos {
                cell,
                partition: Partition::Whole,
                source,
            })?;
        self.cells.pressure.current_mut()[i] = restored_current.pressure;
        self.cells.sound_speed.current_mut()[i] = restored_current.sound_speed;
        self.cells.stress[i] = deviator_new - (restored_new.pressure + pseudo_new);

        // Flags: the cell reverts; each boundary node reverts only if
        // its other adjacent cell is not enriched.
        self.cells.set_classical(cell, true);
        for node in [disc.in_node, disc.out_node] {
            let enriched_neighbour = self
                .topology
                .cells_of_node(node)
                .iter()
                .any(|&c| !self.cells.is_classical(c));
            self.nodes.set_classical(node, !enriched_neighbour);
        }

        // Exact reverse of the enrichment mass redistribution.
        self.nodes.adjust_mass(disc.in_node, disc.right_mass / 2.0);
        self.nodes.adjust_mass(disc.out_node, disc.left_mass / 2.0);

        // Dissipated cohesive energy vs. target, kept for diagnostics.
        self.cells
            .record_cohesive_energy(cell, disc.dissipated_energy.new);
        self.metrics.deenrichment_events += 1;
        Ok(())
    }

    /// Enrich every masked cell that is currently classical, consuming
    /// the rupture mask.
    pub(crate) fn apply_rupture_mask(&mut self) -> Result<(), StepError> {
        let cell_count = self.cells.cell_count();
        let mask = std::mem::replace(&mut self.rupture_mask, vec![false; cell_count]);
        for (i, flagged) in mask.into_iter().enumerate() {
            let cell = CellId(i as u32);
            if flagged && self.cells.is_classical(cell) {
                self.enrich_cell(cell)?;
            }
        }
        Ok(())
    }

    /// De-enrich every flagged cell that is currently enriched,
    /// consuming the de-enrichment mask.
    pub(crate) fn apply_deenrichment_mask(&mut self) -> Result<(), StepError> {
        let mask = self.cells.take_deenrichment_mask();
        for (i, flagged) in mask.into_iter().enumerate() {
            let cell = CellId(i as u32);
            if flagged && !self.cells.is_classical(cell) {
                self.deenrich_cell(cell)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use spall_core::CellId;
    use crate::test_fixtures::uniform_bar_config;

    use crate::simulation::Simulation;

    #[test]
    fn rupture_mask_skips_enriched_cells() {
        let mut sim = Simulation::new(uniform_bar_config(6)).unwrap();
        sim.enrich_cell(CellId(2)).unwrap();

        // Mask hits the already-enriched cell and a fresh one; only the
        // fresh one may transition.
        sim.rupture_mask = vec![false, false, true, true, false, false];
        sim.apply_rupture_mask().unwrap();
        assert_eq!(sim.registry.len(), 2);
        assert_eq!(sim.metrics.enrichment_events, 2);
        assert!(!sim.cells.is_classical(CellId(3)));

        // The mask was consumed: re-applying does nothing.
        sim.apply_rupture_mask().unwrap();
        assert_eq!(sim.registry.len(), 2);
    }

    #[test]
    fn deenrichment_mask_is_one_shot() {
        let mut sim = Simulation::new(uniform_bar_config(6)).unwrap();
        sim.enrich_cell(CellId(2)).unwrap();
        sim.cells.request_deenrichment(CellId(2));

        sim.apply_deenrichment_mask().unwrap();
        assert!(sim.cells.is_classical(CellId(2)));
        assert!(sim.registry.is_empty());
        assert_eq!(sim.metrics.deenrichment_events, 1);

        // Consumed: a second pass is a no-op, not an error.
        sim.apply_deenrichment_mask().unwrap();
        assert_eq!(sim.metrics.deenrichment_events, 1);
    }

    #[test]
    fn stale_deenrichment_flag_on_classical_cell_is_skipped() {
        // The mask application filters on current enrichment status, so
        // a flag left on a classical cell is dropped silently; only the
        // direct transition call is fatal.
        let mut sim = Simulation::new(uniform_bar_config(6)).unwrap();
        sim.cells.request_deenrichment(CellId(1));
        sim.apply_deenrichment_mask().unwrap();
        assert_eq!(sim.metrics.deenrichment_events, 0);
    }
}
