//! Nodal and crack-face force assembly.

use spall_cohesive::{Face, PorosityGate};

use crate::simulation::Simulation;

impl Simulation {
    /// Assemble all forces from the freshly solved (new) pressures and
    /// pseudo-viscosities.
    ///
    /// Each partition pushes `(p + q) * S` outward on its two
    /// boundaries. Crack faces additionally carry the cohesive traction,
    /// which opposes the tension trying to open the interface. Boundary
    /// nodes receive the configured pressure loading at the current
    /// time. The forces assembled here drive the velocity update at the
    /// start of the next step.
    pub(crate) fn assemble_forces(&mut self) {
        let topo = self.topology;
        let section = self.section;

        self.nodes.reset_forces();
        for (_, disc) in self.registry.iter_mut() {
            disc.reset_face_forces();
        }

        // Partition pressures on the mesh nodes.
        for cell in topo.cells() {
            let i = cell.index();
            let [left, right] = topo.nodes_of_cell(cell);
            if self.cells.is_classical(cell) {
                let pq =
                    (self.cells.pressure.new_values()[i] + self.cells.pseudo.new_values()[i])
                        * section;
                self.nodes.add_force(left, -pq);
                self.nodes.add_force(right, pq);
            } else {
                let pq_left =
                    (self.cells.pressure.new_values()[i] + self.cells.pseudo.new_values()[i])
                        * section;
                let pq_right = (self.cells.right.pressure.new_values()[i]
                    + self.cells.right.pseudo.new_values()[i])
                    * section;
                self.nodes.add_force(left, -pq_left);
                self.nodes.add_force(right, pq_right);
            }
        }

        // Sub-partition pressures and cohesive tractions on the crack
        // faces. The cohesive evaluation also surfaces the coupling
        // model's side-effect requests, applied to the cell store after
        // the loop.
        let mut porosity_gates = Vec::new();
        let mut deenrichment_requests = Vec::new();
        for (_, disc) in self.registry.iter_mut() {
            let i = disc.cell.index();
            let opening = disc.opening.new;
            let outcome = self.cohesive.compute_force(disc, opening);
            let cohesive = outcome.force * section;
            let pq_left = (self.cells.pressure.new_values()[i]
                + self.cells.pseudo.new_values()[i])
                * section;
            let pq_right = (self.cells.right.pressure.new_values()[i]
                + self.cells.right.pseudo.new_values()[i])
                * section;
            disc.add_face_force(Face::Left, pq_left + cohesive);
            disc.add_face_force(Face::Right, -pq_right - cohesive);
            if let Some(gate) = outcome.porosity_gate {
                porosity_gates.push((disc.cell, gate));
            }
            if outcome.request_deenrichment {
                deenrichment_requests.push(disc.cell);
            }
        }
        for (cell, gate) in porosity_gates {
            self.cells
                .set_porosity_growth_allowed(cell, matches!(gate, PorosityGate::Allow));
        }
        for cell in deenrichment_requests {
            self.cells.request_deenrichment(cell);
        }

        // Boundary loading.
        let left_pressure = self.left_boundary.evaluate(self.time);
        let right_pressure = self.right_boundary.evaluate(self.time);
        self.nodes.apply_pressure_left(left_pressure, section);
        self.nodes.apply_pressure_right(right_pressure, section);
    }
}
