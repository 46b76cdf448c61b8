//! The simulation object and its fixed-order explicit step.

use std::time::Instant;

use spall_cohesive::{CohesiveCalculationModel, CohesiveZoneModel, DiscontinuityRegistry};
use spall_core::{CellId, Partition, StepError};
use spall_material::{
    solve_partition_energy, update_deviatoric_stress, EquationOfState, NewtonRaphson,
    PartitionError, ShearModulusModel, YieldStressModel,
};
use spall_mesh::{CellInit, CellStore, NodeStore, Topology1D};
use spall_rupture::{CriterionInput, RuptureCriterion};

use crate::config::{ConfigError, SimulationConfig};
use crate::loading::PressureLaw;
use crate::metrics::StepMetrics;
use crate::observation::SimulationSnapshot;

/// Result of a successful step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    /// CFL-critical timestep over every cell partition [s].
    ///
    /// Advisory: the driver decides whether to adopt it for the next
    /// step; the engine never clamps silently.
    pub critical_dt: f64,
}

/// A 1D Lagrangian spall simulation.
///
/// Owns all state and executes steps synchronously. Within a step every
/// operation reads current (time t) values and writes new (time t + dt)
/// values; the final commit publishes the new state, so no operation
/// observes a half-updated field.
pub struct Simulation {
    pub(crate) topology: Topology1D,
    pub(crate) nodes: NodeStore,
    pub(crate) cells: CellStore,
    pub(crate) registry: DiscontinuityRegistry,
    pub(crate) criterion: Box<dyn RuptureCriterion>,
    pub(crate) calculation: Box<dyn CohesiveCalculationModel>,
    pub(crate) cohesive: CohesiveZoneModel,
    pub(crate) eos: Box<dyn EquationOfState>,
    pub(crate) shear_modulus: Box<dyn ShearModulusModel>,
    pub(crate) yield_stress: Box<dyn YieldStressModel>,
    pub(crate) newton: NewtonRaphson,
    pub(crate) pseudo_a: f64,
    pub(crate) pseudo_b: f64,
    pub(crate) cfl: f64,
    pub(crate) section: f64,
    pub(crate) rupture_position: f64,
    pub(crate) left_boundary: Box<dyn PressureLaw>,
    pub(crate) right_boundary: Box<dyn PressureLaw>,
    pub(crate) rupture_mask: Vec<bool>,
    pub(crate) time: f64,
    pub(crate) step_index: u64,
    pub(crate) metrics: StepMetrics,
}

impl Simulation {
    /// Build a simulation from a validated configuration.
    ///
    /// Consumes the config. Seeds cell sizes from the initial
    /// coordinates, fixes cell and nodal masses, and evaluates the EOS
    /// once at the initial state for the starting sound speed.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let topology = Topology1D::new(config.initial_coordinates.len())?;
        let nodes = NodeStore::new(&config.initial_coordinates, &config.initial_velocities)?;

        // Starting sound speed comes from the EOS at the initial state.
        let v0 = 1.0 / config.material.initial_density;
        let initial = config.material.eos.evaluate(v0, config.material.initial_energy)?;

        let mut cells = CellStore::new(
            topology.cell_count(),
            CellInit {
                density: config.material.initial_density,
                pressure: config.material.initial_pressure,
                energy: config.material.initial_energy,
                sound_speed: initial.sound_speed,
                porosity: config.material.initial_porosity,
            },
        );
        cells.compute_initial_sizes(&topology, nodes.positions())?;
        cells.compute_masses(config.section);

        let mut nodes = nodes;
        nodes.compute_masses_wilkins(&topology, cells.masses());

        let cell_count = topology.cell_count();
        Ok(Self {
            topology,
            nodes,
            cells,
            registry: DiscontinuityRegistry::new(),
            criterion: config.rupture_criterion,
            calculation: config.cohesive.calculation,
            cohesive: CohesiveZoneModel::new(config.cohesive.unloading),
            eos: config.material.eos,
            shear_modulus: config.material.shear_modulus,
            yield_stress: config.material.yield_stress,
            newton: config.numerics.newton,
            pseudo_a: config.numerics.pseudo_a,
            pseudo_b: config.numerics.pseudo_b,
            cfl: config.numerics.cfl,
            section: config.section,
            rupture_position: config.rupture_position,
            left_boundary: config.left_boundary,
            right_boundary: config.right_boundary,
            rupture_mask: vec![false; cell_count],
            time: 0.0,
            step_index: 0,
            metrics: StepMetrics::default(),
        })
    }

    /// Execute one explicit step of size `dt`.
    ///
    /// Fixed order; any failure aborts the step (and the run) with the
    /// offending entity in the error.
    pub fn step(&mut self, dt: f64) -> Result<StepOutcome, StepError> {
        let start = Instant::now();

        // 1. Half-step velocities from the forces assembled last step.
        self.nodes.compute_new_velocities(dt);
        for (_, disc) in self.registry.iter_mut() {
            disc.compute_new_face_velocities(dt);
        }

        // 2. Positions.
        self.nodes.compute_new_positions(dt);
        for (_, disc) in self.registry.iter_mut() {
            disc.compute_new_face_positions(dt);
        }

        // 3. Sizes: classical cells from node spans, enriched cells from
        //    crack-face kinematics.
        self.cells
            .compute_new_sizes_classical(&self.topology, self.nodes.new_positions())?;
        self.update_enriched_sizes()?;

        // 4. Densities per partition.
        self.cells.compute_new_densities();

        // 5. EOS solve per partition.
        self.solve_energies()?;

        // 6. Pseudo-viscosity, then the stress update it feeds.
        self.cells.compute_new_pseudo(dt, self.pseudo_a, self.pseudo_b);
        self.update_deviatoric_stresses(dt);
        self.cells.update_total_stress();

        // 7. Rupture check and transitions (masks are one-shot).
        self.evaluate_rupture();
        self.apply_rupture_mask()?;
        self.apply_deenrichment_mask()?;

        // 8. Force assembly, including cohesive tractions and boundary
        //    loading at the current time.
        self.assemble_forces();

        // 9. Critical timestep (advisory).
        let critical_dt = self.cells.compute_critical_dt(self.cfl);

        // 10. Commit new state as current.
        self.nodes.commit();
        self.cells.commit();
        self.registry.commit_all();
        self.time += dt;
        self.step_index += 1;

        self.metrics.total_us = start.elapsed().as_micros() as u64;
        self.metrics.critical_dt = critical_dt;
        self.metrics.enriched_cells = self.cells.enriched_cells().len();
        self.metrics.live_discontinuities = self.registry.len();

        Ok(StepOutcome { critical_dt })
    }

    /// New left/right sizes of every enriched cell from its crack-face
    /// and boundary-node kinematics.
    fn update_enriched_sizes(&mut self) -> Result<(), StepError> {
        let x_new = self.nodes.new_positions();
        let mut sizes = Vec::new();
        for (_, disc) in self.registry.iter() {
            let left = disc.face_position[0].new - x_new[disc.in_node.index()];
            let right = x_new[disc.out_node.index()] - disc.face_position[1].new;
            sizes.push((disc.cell, left, right));
        }
        for (cell, left, right) in sizes {
            self.cells.set_enriched_sizes(cell, left, right)?;
        }
        Ok(())
    }

    /// Implicit energy solve for every partition needing resolution:
    /// all base partitions plus the right partition of enriched cells.
    fn solve_energies(&mut self) -> Result<(), StepError> {
        let n = self.cells.cell_count();
        for i in 0..n {
            let cell = CellId(i as u32);
            let partition = if self.cells.is_classical(cell) {
                Partition::Whole
            } else {
                Partition::Left
            };
            let effective_pressure =
                self.cells.pressure.current()[i] + 2.0 * self.cells.pseudo.current()[i];
            let solution = solve_partition_energy(
                self.eos.as_ref(),
                &self.newton,
                self.cells.density.current()[i],
                self.cells.density.new_values()[i],
                effective_pressure,
                self.cells.energy.current()[i],
            )
            .map_err(|e| wrap_partition_error(e, cell, partition))?;
            self.cells.energy.new_values_mut()[i] = solution.energy;
            self.cells.pressure.new_values_mut()[i] = solution.pressure;
            self.cells.sound_speed.new_values_mut()[i] = solution.sound_speed;

            if partition == Partition::Left {
                let effective_pressure = self.cells.right.pressure.current()[i]
                    + 2.0 * self.cells.right.pseudo.current()[i];
                let solution = solve_partition_energy(
                    self.eos.as_ref(),
                    &self.newton,
                    self.cells.right.density.current()[i],
                    self.cells.right.density.new_values()[i],
                    effective_pressure,
                    self.cells.right.energy.current()[i],
                )
                .map_err(|e| wrap_partition_error(e, cell, Partition::Right))?;
                self.cells.right.energy.new_values_mut()[i] = solution.energy;
                self.cells.right.pressure.new_values_mut()[i] = solution.pressure;
                self.cells.right.sound_speed.new_values_mut()[i] = solution.sound_speed;
            }
        }
        Ok(())
    }

    /// Deviatoric stress update per partition from the new velocity
    /// gradients, with von Mises radial return.
    fn update_deviatoric_stresses(&mut self, dt: f64) {
        let topo = self.topology;
        let u = self.nodes.new_velocities();
        for cell in topo.cells() {
            let i = cell.index();
            if !self.cells.is_classical(cell) {
                continue;
            }
            let [left, right] = topo.nodes_of_cell(cell);
            let rate = (u[right.index()] - u[left.index()]) / self.cells.size.new_values()[i];
            let rho = self.cells.density.new_values()[i];
            let s = update_deviatoric_stress(
                self.cells.deviator.current()[i],
                rate,
                dt,
                self.shear_modulus.shear_modulus(rho),
                self.yield_stress.yield_stress(rho),
            );
            self.cells.deviator.new_values_mut()[i] = s;
        }
        for (_, disc) in self.registry.iter() {
            let i = disc.cell.index();
            let rate_left = (disc.face_velocity[0].new - u[disc.in_node.index()])
                / self.cells.size.new_values()[i];
            let rho_left = self.cells.density.new_values()[i];
            let s_left = update_deviatoric_stress(
                self.cells.deviator.current()[i],
                rate_left,
                dt,
                self.shear_modulus.shear_modulus(rho_left),
                self.yield_stress.yield_stress(rho_left),
            );
            self.cells.deviator.new_values_mut()[i] = s_left;

            let rate_right = (u[disc.out_node.index()] - disc.face_velocity[1].new)
                / self.cells.right.size.new_values()[i];
            let rho_right = self.cells.right.density.new_values()[i];
            let s_right = update_deviatoric_stress(
                self.cells.right.deviator.current()[i],
                rate_right,
                dt,
                self.shear_modulus.shear_modulus(rho_right),
                self.yield_stress.yield_stress(rho_right),
            );
            self.cells.right.deviator.new_values_mut()[i] = s_right;
        }
    }

    /// Evaluate the rupture criterion into the one-shot mask.
    fn evaluate_rupture(&mut self) {
        let topo = self.topology;
        let x = self.nodes.new_positions();
        let n = self.cells.cell_count();
        let mut centers = vec![0.0; n];
        let mut right_centers = vec![0.0; n];
        for cell in topo.cells() {
            let i = cell.index();
            let [left, right] = topo.nodes_of_cell(cell);
            if self.cells.is_classical(cell) {
                centers[i] = 0.5 * (x[left.index()] + x[right.index()]);
                right_centers[i] = centers[i];
            } else {
                centers[i] = x[left.index()] + self.cells.size.new_values()[i] / 2.0;
                right_centers[i] =
                    x[right.index()] - self.cells.right.size.new_values()[i] / 2.0;
            }
        }
        let input = CriterionInput {
            cells: &self.cells,
            centers: &centers,
            right_centers: &right_centers,
        };
        self.rupture_mask = self.criterion.evaluate(&input);
    }

    /// Current simulation time [s].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// The static topology.
    pub fn topology(&self) -> &Topology1D {
        &self.topology
    }

    /// Read-only cell state.
    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    /// Read-only nodal state.
    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    /// Read-only discontinuity registry.
    pub fn registry(&self) -> &DiscontinuityRegistry {
        &self.registry
    }

    /// Metrics from the most recent step.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// Total system mass: nodal masses plus crack-face masses.
    ///
    /// Invariant across any sequence of enrichment and de-enrichment
    /// events.
    pub fn total_mass(&self) -> f64 {
        self.nodes.total_mass() + self.registry.total_face_mass()
    }

    /// Read-only field snapshot for the output collaborator.
    pub fn snapshot(&self) -> SimulationSnapshot<'_> {
        SimulationSnapshot::new(self)
    }
}

/// Attach the failing entity to a partition solve error.
fn wrap_partition_error(error: PartitionError, cell: CellId, partition: Partition) -> StepError {
    match error {
        PartitionError::Solve(source) => StepError::EnergySolve {
            cell,
            partition,
            source,
        },
        PartitionError::Eos(source) => StepError::Eos {
            cell,
            partition,
            source,
        },
    }
}
