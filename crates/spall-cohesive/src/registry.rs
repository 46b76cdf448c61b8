//! The registry of live discontinuities.

use indexmap::IndexMap;
use spall_core::{CellId, DiscontinuityId};

use crate::discontinuity::Discontinuity;

/// Owned, indexable collection of every live [`Discontinuity`].
///
/// Handles come from a monotonic counter and are never reused, so
/// removing one record cannot re-key or invalidate another — the
/// compaction hazard of positional parallel arrays is designed out.
/// Iteration follows insertion (enrichment) order.
///
/// Mutated only by the enrichment transitions, strictly between
/// sub-steps; everything else reads.
#[derive(Debug, Default)]
pub struct DiscontinuityRegistry {
    items: IndexMap<DiscontinuityId, Discontinuity>,
    next_id: u64,
}

impl DiscontinuityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a discontinuity, returning its stable handle.
    pub fn register(&mut self, disc: Discontinuity) -> DiscontinuityId {
        let id = DiscontinuityId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, disc);
        id
    }

    /// Remove a discontinuity by handle, preserving the order of the
    /// survivors.
    pub fn remove(&mut self, id: DiscontinuityId) -> Option<Discontinuity> {
        self.items.shift_remove(&id)
    }

    /// Look up a discontinuity by handle.
    pub fn get(&self, id: DiscontinuityId) -> Option<&Discontinuity> {
        self.items.get(&id)
    }

    /// Mutable lookup by handle.
    pub fn get_mut(&mut self, id: DiscontinuityId) -> Option<&mut Discontinuity> {
        self.items.get_mut(&id)
    }

    /// The discontinuity living on a given cell, if any.
    ///
    /// At most one crack lives in a cell at a time.
    pub fn find_by_cell(&self, cell: CellId) -> Option<(DiscontinuityId, &Discontinuity)> {
        self.items
            .iter()
            .find(|(_, d)| d.cell == cell)
            .map(|(&id, d)| (id, d))
    }

    /// Number of live discontinuities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no discontinuities are live.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in enrichment order.
    pub fn iter(&self) -> impl Iterator<Item = (DiscontinuityId, &Discontinuity)> {
        self.items.iter().map(|(&id, d)| (id, d))
    }

    /// Mutable iteration in enrichment order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (DiscontinuityId, &mut Discontinuity)> {
        self.items.iter_mut().map(|(&id, d)| (id, d))
    }

    /// Sum of all crack-face masses (for the mass-conservation ledger).
    pub fn total_face_mass(&self) -> f64 {
        self.items.values().map(|d| d.total_face_mass()).sum()
    }

    /// Publish every discontinuity's new values as current.
    pub fn commit_all(&mut self) {
        for disc in self.items.values_mut() {
            disc.commit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law::CohesiveLaw;
    use spall_core::NodeId;

    fn disc(cell: u32) -> Discontinuity {
        let law = CohesiveLaw::new(1.0e9, 1.0e-5).unwrap();
        Discontinuity::new(
            CellId(cell),
            NodeId(cell),
            NodeId(cell + 1),
            0.5,
            law,
            law.max_dissipated_energy(),
            1.0,
            1.0,
        )
    }

    #[test]
    fn handles_are_never_reused() {
        let mut reg = DiscontinuityRegistry::new();
        let a = reg.register(disc(0));
        reg.remove(a).unwrap();
        let b = reg.register(disc(0));
        assert_ne!(a, b);
        assert!(reg.get(a).is_none(), "stale handle must not resolve");
        assert!(reg.get(b).is_some());
    }

    #[test]
    fn removal_preserves_other_handles_and_order() {
        let mut reg = DiscontinuityRegistry::new();
        let a = reg.register(disc(0));
        let b = reg.register(disc(1));
        let c = reg.register(disc(2));
        reg.remove(b).unwrap();

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(a).unwrap().cell, CellId(0));
        assert_eq!(reg.get(c).unwrap().cell, CellId(2));
        let order: Vec<CellId> = reg.iter().map(|(_, d)| d.cell).collect();
        assert_eq!(order, vec![CellId(0), CellId(2)]);
    }

    #[test]
    fn find_by_cell() {
        let mut reg = DiscontinuityRegistry::new();
        reg.register(disc(3));
        let id = reg.register(disc(7));
        let (found, d) = reg.find_by_cell(CellId(7)).unwrap();
        assert_eq!(found, id);
        assert_eq!(d.cell, CellId(7));
        assert!(reg.find_by_cell(CellId(9)).is_none());
    }

    #[test]
    fn total_face_mass_sums_all_faces() {
        let mut reg = DiscontinuityRegistry::new();
        reg.register(disc(0));
        reg.register(disc(1));
        // Each fixture disc carries 0.5 + 0.5 kg of face mass.
        assert!((reg.total_face_mass() - 2.0).abs() < 1e-12);
    }
}
