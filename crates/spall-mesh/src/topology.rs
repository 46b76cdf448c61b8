//! Static node–cell adjacency for a 1D rod.

use smallvec::{smallvec, SmallVec};
use spall_core::{CellId, MeshError, NodeId};

/// Node–cell adjacency for a 1D rod mesh.
///
/// The structure is fully determined by the node count: cell `i` is
/// bounded by nodes `i` and `i + 1`, an interior node touches two cells,
/// and each end node touches one. Queries are computed, not stored.
///
/// # Examples
///
/// ```
/// use spall_mesh::Topology1D;
/// use spall_core::{CellId, NodeId};
///
/// let topo = Topology1D::new(5).unwrap();
/// assert_eq!(topo.cell_count(), 4);
/// assert_eq!(topo.nodes_of_cell(CellId(2)), [NodeId(2), NodeId(3)]);
///
/// // Interior node touches two cells, end node one.
/// assert_eq!(topo.cells_of_node(NodeId(2)).as_slice(), &[CellId(1), CellId(2)]);
/// assert_eq!(topo.cells_of_node(NodeId(0)).as_slice(), &[CellId(0)]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topology1D {
    node_count: u32,
}

impl Topology1D {
    /// Create the topology for a rod with `node_count` nodes.
    ///
    /// Returns `Err(MeshError::TooFewNodes)` for fewer than two nodes.
    pub fn new(node_count: usize) -> Result<Self, MeshError> {
        if node_count < 2 {
            return Err(MeshError::TooFewNodes { count: node_count });
        }
        let node_count = u32::try_from(node_count)
            .map_err(|_| MeshError::TooFewNodes { count: 0 })?;
        Ok(Self { node_count })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count as usize
    }

    /// Number of cells (`node_count - 1`).
    pub fn cell_count(&self) -> usize {
        self.node_count as usize - 1
    }

    /// The two boundary nodes of a cell, left then right.
    pub fn nodes_of_cell(&self, cell: CellId) -> [NodeId; 2] {
        [NodeId(cell.0), NodeId(cell.0 + 1)]
    }

    /// The cells touching a node, in left-to-right order.
    ///
    /// One entry for an end node, two for an interior node.
    pub fn cells_of_node(&self, node: NodeId) -> SmallVec<[CellId; 2]> {
        let mut cells = smallvec![];
        if node.0 > 0 {
            cells.push(CellId(node.0 - 1));
        }
        if (node.0 as usize) < self.cell_count() {
            cells.push(CellId(node.0));
        }
        cells
    }

    /// The cell to the left of a node, if any.
    pub fn left_cell(&self, node: NodeId) -> Option<CellId> {
        (node.0 > 0).then(|| CellId(node.0 - 1))
    }

    /// The cell to the right of a node, if any.
    pub fn right_cell(&self, node: NodeId) -> Option<CellId> {
        ((node.0 as usize) < self.cell_count()).then_some(CellId(node.0))
    }

    /// Iterate over all cell ids in left-to-right order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        (0..self.node_count - 1).map(CellId)
    }

    /// Iterate over all node ids in left-to-right order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count).map(NodeId)
    }
}
