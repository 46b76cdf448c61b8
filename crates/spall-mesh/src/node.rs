//! Nodal state: positions, half-step velocities, masses, forces.

use spall_core::{MeshError, NodeId, StateField};

use crate::topology::Topology1D;

/// Whole-array nodal state for the rod.
///
/// Velocities live on half time levels: `velocity.current()` is
/// `u^{n-1/2}` and `velocity.new_values()` is `u^{n+1/2}`. Positions are
/// full time levels (`x^n` / `x^{n+1}`). Forces are accumulated during
/// assembly at the end of a step and consumed by the velocity update at
/// the start of the next one.
///
/// Nodal masses are fixed after [`compute_masses_wilkins`](Self::compute_masses_wilkins)
/// except for the explicit redistribution performed by the enrichment
/// transitions.
#[derive(Clone, Debug)]
pub struct NodeStore {
    position: StateField,
    velocity: StateField,
    mass: Vec<f64>,
    force: Vec<f64>,
    classical: Vec<bool>,
}

impl NodeStore {
    /// Build nodal state from initial coordinates and velocities.
    ///
    /// Coordinates must be strictly increasing and both slices must have
    /// the same length of at least two.
    pub fn new(
        initial_coordinates: &[f64],
        initial_velocities: &[f64],
    ) -> Result<Self, MeshError> {
        let n = initial_coordinates.len();
        if n < 2 {
            return Err(MeshError::TooFewNodes { count: n });
        }
        if initial_velocities.len() != n {
            return Err(MeshError::ShapeMismatch {
                what: "initial velocities",
                expected: n,
                actual: initial_velocities.len(),
            });
        }
        for i in 1..n {
            if initial_coordinates[i] <= initial_coordinates[i - 1] {
                return Err(MeshError::NonMonotonicNodes {
                    node: NodeId(i as u32),
                });
            }
        }
        Ok(Self {
            position: StateField::from_values(initial_coordinates.to_vec()),
            velocity: StateField::from_values(initial_velocities.to_vec()),
            mass: vec![0.0; n],
            force: vec![0.0; n],
            classical: vec![true; n],
        })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.mass.len()
    }

    /// Positions at time t.
    pub fn positions(&self) -> &[f64] {
        self.position.current()
    }

    /// Positions at time t + dt.
    pub fn new_positions(&self) -> &[f64] {
        self.position.new_values()
    }

    /// Half-step velocities `u^{n-1/2}`.
    pub fn velocities(&self) -> &[f64] {
        self.velocity.current()
    }

    /// Half-step velocities `u^{n+1/2}`.
    pub fn new_velocities(&self) -> &[f64] {
        self.velocity.new_values()
    }

    /// Nodal masses.
    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    /// Current force accumulators.
    pub fn forces(&self) -> &[f64] {
        &self.force
    }

    /// Per-node classical flags (`false` where the node borders an
    /// enriched cell).
    pub fn classical(&self) -> &[bool] {
        &self.classical
    }

    /// Whether a node is classical.
    pub fn is_classical(&self, node: NodeId) -> bool {
        self.classical[node.index()]
    }

    /// Set a node's classical flag. Used only by the enrichment
    /// transitions.
    pub fn set_classical(&mut self, node: NodeId, classical: bool) {
        self.classical[node.index()] = classical;
    }

    /// Lump cell masses onto nodes (Wilkins averaging): every cell
    /// contributes half its mass to each of its two boundary nodes.
    ///
    /// The halving makes the lumping exactly conservative: the nodal
    /// masses sum to the total cell mass, including at the rod ends.
    pub fn compute_masses_wilkins(&mut self, topology: &Topology1D, cell_mass: &[f64]) {
        for m in &mut self.mass {
            *m = 0.0;
        }
        for cell in topology.cells() {
            let [left, right] = topology.nodes_of_cell(cell);
            let half = cell_mass[cell.index()] / 2.0;
            self.mass[left.index()] += half;
            self.mass[right.index()] += half;
        }
    }

    /// Shift mass between the store and a crack face during an
    /// enrichment transition. Positive `delta` adds mass to the node.
    pub fn adjust_mass(&mut self, node: NodeId, delta: f64) {
        self.mass[node.index()] += delta;
    }

    /// Sum of nodal masses.
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Half-step velocity update: `u^{n+1/2} = u^{n-1/2} + F/m * dt`.
    pub fn compute_new_velocities(&mut self, dt: f64) {
        let (u_old, u_new) = self.velocity.levels_mut();
        for i in 0..u_new.len() {
            u_new[i] = u_old[i] + self.force[i] / self.mass[i] * dt;
        }
    }

    /// Position update: `x^{n+1} = x^n + u^{n+1/2} * dt`.
    pub fn compute_new_positions(&mut self, dt: f64) {
        let u = self.velocity.new_values();
        let (x_old, x_new) = self.position.levels_mut();
        for i in 0..x_new.len() {
            x_new[i] = x_old[i] + u[i] * dt;
        }
    }

    /// Zero the force accumulators before assembly.
    pub fn reset_forces(&mut self) {
        for f in &mut self.force {
            *f = 0.0;
        }
    }

    /// Accumulate a force contribution on one node.
    pub fn add_force(&mut self, node: NodeId, force: f64) {
        self.force[node.index()] += force;
    }

    /// Apply a boundary pressure on the left end node (pushes +x).
    pub fn apply_pressure_left(&mut self, pressure: f64, section: f64) {
        self.force[0] += pressure * section;
    }

    /// Apply a boundary pressure on the right end node (pushes -x).
    pub fn apply_pressure_right(&mut self, pressure: f64, section: f64) {
        let last = self.force.len() - 1;
        self.force[last] -= pressure * section;
    }

    /// Publish new positions and velocities as current.
    pub fn commit(&mut self) {
        self.position.commit();
        self.velocity.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_4() -> NodeStore {
        NodeStore::new(&[0.0, 1.0, 2.0, 3.0], &[0.0; 4]).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_shape_mismatch() {
        let err = NodeStore::new(&[0.0, 1.0, 2.0], &[0.0; 2]).unwrap_err();
        assert!(matches!(err, MeshError::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_non_monotonic_coordinates() {
        let err = NodeStore::new(&[0.0, 2.0, 1.0], &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::NonMonotonicNodes { node: NodeId(2) }
        ));
    }

    #[test]
    fn rejects_duplicate_coordinates() {
        let err = NodeStore::new(&[0.0, 1.0, 1.0], &[0.0; 3]).unwrap_err();
        assert!(matches!(err, MeshError::NonMonotonicNodes { .. }));
    }

    #[test]
    fn rejects_single_node() {
        let err = NodeStore::new(&[0.0], &[0.0]).unwrap_err();
        assert!(matches!(err, MeshError::TooFewNodes { count: 1 }));
    }

    // ── Mass lumping ────────────────────────────────────────────

    #[test]
    fn wilkins_masses_conserve_total() {
        let mut nodes = store_4();
        let topo = Topology1D::new(4).unwrap();
        let cell_mass = [2.0, 4.0, 6.0];
        nodes.compute_masses_wilkins(&topo, &cell_mass);

        // End nodes get half of one cell, interior nodes half of each.
        assert_eq!(nodes.masses(), &[1.0, 3.0, 5.0, 3.0]);
        let total: f64 = cell_mass.iter().sum();
        assert!((nodes.total_mass() - total).abs() < 1e-12);
    }

    // ── Kinematics ──────────────────────────────────────────────

    #[test]
    fn velocity_update_uses_force_over_mass() {
        let mut nodes = store_4();
        let topo = Topology1D::new(4).unwrap();
        nodes.compute_masses_wilkins(&topo, &[2.0, 2.0, 2.0]);
        nodes.add_force(NodeId(1), 4.0);
        nodes.compute_new_velocities(0.5);
        // m = 2.0, a = 2.0, dt = 0.5
        assert!((nodes.new_velocities()[1] - 1.0).abs() < 1e-12);
        assert_eq!(nodes.new_velocities()[0], 0.0);
    }

    #[test]
    fn position_update_uses_new_velocity() {
        let mut nodes = NodeStore::new(&[0.0, 1.0], &[3.0, -3.0]).unwrap();
        nodes.compute_new_positions(0.1);
        assert!((nodes.new_positions()[0] - 0.3).abs() < 1e-12);
        assert!((nodes.new_positions()[1] - 0.7).abs() < 1e-12);
        // Current positions untouched until commit.
        assert_eq!(nodes.positions(), &[0.0, 1.0]);
        nodes.commit();
        assert!((nodes.positions()[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn boundary_pressure_signs() {
        let mut nodes = store_4();
        nodes.apply_pressure_left(10.0, 2.0);
        nodes.apply_pressure_right(10.0, 2.0);
        assert_eq!(nodes.forces()[0], 20.0);
        assert_eq!(nodes.forces()[3], -20.0);
    }
}
