//! The run-time record of one active crack interface.

use spall_core::{CellId, NodeId, StatePair};

use crate::law::CohesiveLaw;

/// Crack face selector: the two extra kinematic dofs of an enriched cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    /// Right boundary of the left sub-partition.
    Left = 0,
    /// Left boundary of the right sub-partition.
    Right = 1,
}

/// One active crack: geometry, cohesive history, and the crack-face
/// kinematic dofs it owns on behalf of its enriched nodes.
///
/// Created by the enrichment transition, destroyed by de-enrichment.
/// The cohesive law is frozen at creation; everything else evolves step
/// by step. Damage is non-decreasing by construction of the cohesive
/// branches.
#[derive(Clone, Debug)]
pub struct Discontinuity {
    /// Cell this crack lives in.
    pub cell: CellId,
    /// Left ("in") boundary node of the enriched cell.
    pub in_node: NodeId,
    /// Right ("out") boundary node of the enriched cell.
    pub out_node: NodeId,
    /// Fractional crack position inside the original cell, in (0, 1).
    pub position: f64,
    /// The frozen traction–separation law.
    pub law: CohesiveLaw,
    /// Crack opening (current/new) [m].
    pub opening: StatePair,
    /// Largest opening ever reached [m].
    pub history_max_opening: f64,
    /// Loading-law traction at the largest opening [Pa].
    pub history_min_force: f64,
    /// Damage variable in [0, 1] (current/new).
    pub damage: StatePair,
    /// Cohesive energy dissipated so far, per unit area (current/new).
    pub dissipated_energy: StatePair,
    /// Energy the crack is meant to dissipate before de-enrichment
    /// [J/m2].
    pub energy_target: f64,
    /// Crack face positions [m], indexed by [`Face`].
    pub face_position: [StatePair; 2],
    /// Crack face half-step velocities [m/s], indexed by [`Face`].
    pub face_velocity: [StatePair; 2],
    /// Crack face force accumulators [N], indexed by [`Face`].
    pub face_force: [f64; 2],
    /// Crack face lumped masses [kg], indexed by [`Face`].
    pub face_mass: [f64; 2],
    /// Frozen mass of the left sub-partition [kg].
    pub left_mass: f64,
    /// Frozen mass of the right sub-partition [kg].
    pub right_mass: f64,
}

impl Discontinuity {
    /// Create the record for a freshly enriched cell.
    ///
    /// Faces carry half of their sub-partition's mass; positions and
    /// velocities are seeded by
    /// [`initialize_faces`](Self::initialize_faces) once the engine has
    /// computed them.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cell: CellId,
        in_node: NodeId,
        out_node: NodeId,
        position: f64,
        law: CohesiveLaw,
        energy_target: f64,
        left_mass: f64,
        right_mass: f64,
    ) -> Self {
        Self {
            cell,
            in_node,
            out_node,
            position,
            law,
            opening: StatePair::both(0.0),
            history_max_opening: 0.0,
            history_min_force: law.critical_strength,
            damage: StatePair::both(0.0),
            dissipated_energy: StatePair::both(0.0),
            energy_target,
            face_position: [StatePair::both(0.0); 2],
            face_velocity: [StatePair::both(0.0); 2],
            face_force: [0.0; 2],
            face_mass: [left_mass / 2.0, right_mass / 2.0],
            left_mass,
            right_mass,
        }
    }

    /// Seed the crack-face kinematics at the moment of enrichment.
    ///
    /// Both faces start at the crack plane (current and new positions
    /// supplied separately so the opening is exactly zero at both time
    /// levels) with the same interpolated velocity, so the opening rate
    /// is also zero on the creation step.
    pub fn initialize_faces(
        &mut self,
        position_current: f64,
        position_new: f64,
        velocity: f64,
    ) {
        for face in &mut self.face_position {
            face.current = position_current;
            face.new = position_new;
        }
        for face in &mut self.face_velocity {
            *face = StatePair::both(velocity);
        }
        self.opening = StatePair::both(0.0);
    }

    /// Half-step velocity update of both faces from their forces.
    pub fn compute_new_face_velocities(&mut self, dt: f64) {
        for i in 0..2 {
            self.face_velocity[i].new =
                self.face_velocity[i].current + self.face_force[i] / self.face_mass[i] * dt;
        }
    }

    /// Position update of both faces, then the new opening.
    pub fn compute_new_face_positions(&mut self, dt: f64) {
        for i in 0..2 {
            self.face_position[i].new =
                self.face_position[i].current + self.face_velocity[i].new * dt;
        }
        self.opening.new = self.face_position[Face::Right as usize].new
            - self.face_position[Face::Left as usize].new;
    }

    /// Zero the face force accumulators before assembly.
    pub fn reset_face_forces(&mut self) {
        self.face_force = [0.0; 2];
    }

    /// Accumulate a force on one face.
    pub fn add_face_force(&mut self, face: Face, force: f64) {
        self.face_force[face as usize] += force;
    }

    /// Sum of the two face masses.
    pub fn total_face_mass(&self) -> f64 {
        self.face_mass[0] + self.face_mass[1]
    }

    /// Publish all new values as current.
    pub fn commit(&mut self) {
        self.opening.commit();
        self.damage.commit();
        self.dissipated_energy.commit();
        for face in &mut self.face_position {
            face.commit();
        }
        for face in &mut self.face_velocity {
            face.commit();
        }
    }
}
