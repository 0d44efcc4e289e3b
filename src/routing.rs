//! Ancilla routing for two-patch lattice surgery.
//!
//! A joint measurement `P₁⊗P₂` merges a `P₁`-type boundary of the source
//! patch with a `P₂`-type boundary of the target patch through a channel of
//! free cells. The channel is the shortest path in a directed graph over the
//! cells of the current slice:
//!
//! ```text
//!   source ──▶ free ──▶ free ──▶ ... ──▶ free ──▶ target
//!          (boundary of             (boundary of
//!           type B(P₁))               type B(P₂))
//! ```
//!
//! The only edges out of the source leave through boundaries of the requested
//! type, and the only edges into the target arrive through boundaries of its
//! requested type, so any path found starts and ends on the right edges.
//! Neighbours are always generated inside the box `[(0,0), furthest_cell]`.

use log::{debug, trace, warn};
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::cell::{Cell, SearchBounds};
use crate::error::{LatticeError, Result};
use crate::patch::{
    boundary_for_operator, Boundary, BoundaryType, PatchId, PauliOperator, RoutingRegion,
    SingleCellPatch,
};
use crate::slice::Slice;

/// Graph over the bounded cells of a slice. Node `i` is the cell with
/// row-major index `i`; a twist search appends one extra node.
type CellGraph = DiGraph<Option<Cell>, u32>;

/// Find the shortest free-cell channel between two patch boundaries.
///
/// Returns `Ok(None)` when no channel exists in this slice. When
/// `source_id == target_id` the path leaves through a `source_op` boundary
/// and comes back through a `target_op` boundary of the same patch
/// (twist / S-gate measurement).
///
/// Cells of the returned region are ordered from the source to the target.
pub fn graph_search_route_ancilla(
    slice: &Slice,
    source_id: PatchId,
    source_op: PauliOperator,
    target_id: PatchId,
    target_op: PauliOperator,
) -> Result<Option<RoutingRegion>> {
    let source_boundary = boundary_for_operator(source_op)?;
    let target_boundary = boundary_for_operator(target_op)?;
    let source = single_cell_patch(slice, source_id)?;
    let target = single_cell_patch(slice, target_id)?;

    let bounds = SearchBounds::from_origin(slice.furthest_cell());
    let (Some(source_idx), Some(target_idx)) =
        (bounds.index_of(source.cell), bounds.index_of(target.cell))
    else {
        warn!(
            "patches {} and {} lie outside the routable area {:?}",
            source_id, target_id, bounds
        );
        return Ok(None);
    };

    let free: Vec<bool> = bounds.cells().map(|c| slice.is_cell_free(c)).collect();
    let is_free = |cell: Cell| bounds.index_of(cell).is_some_and(|i| free[i]);

    let mut graph = CellGraph::with_capacity(bounds.area() + 1, 4 * bounds.area());
    for cell in bounds.cells() {
        graph.add_node(Some(cell));
    }
    let node = |cell: Cell| bounds.index_of(cell).map(NodeIndex::new);

    // A path may step into any free cell from any free neighbour
    for cell in bounds.cells().filter(|&c| is_free(c)) {
        let Some(to) = node(cell) else { continue };
        for neighbour in bounds.neighbours(cell) {
            if let (true, Some(from)) = (is_free(neighbour), node(neighbour)) {
                graph.add_edge(from, to, 1);
            }
        }
    }

    let source_node = NodeIndex::new(source_idx);
    for neighbour in bounds.neighbours(source.cell) {
        if is_free(neighbour) && faces(source, neighbour, source_boundary) {
            if let Some(to) = node(neighbour) {
                graph.add_edge(source_node, to, 1);
            }
        }
    }

    // Twist measurements need an endpoint distinct from the source itself,
    // otherwise the search stops at distance zero.
    let target_node = if source_id == target_id {
        graph.add_node(None)
    } else {
        NodeIndex::new(target_idx)
    };
    for neighbour in bounds.neighbours(target.cell) {
        if is_free(neighbour) && faces(target, neighbour, target_boundary) {
            if let Some(from) = node(neighbour) {
                graph.add_edge(from, target_node, 1);
            }
        }
    }

    // Directly adjacent patches merge without ancilla cells
    if source_id != target_id
        && source.cell.is_adjacent(&target.cell)
        && faces(source, target.cell, source_boundary)
        && faces(target, source.cell, target_boundary)
    {
        graph.add_edge(source_node, target_node, 1);
    }

    trace!(
        "routing graph for {}:{:?} -> {}:{:?}: {} nodes, {} edges",
        source_id,
        source_op,
        target_id,
        target_op,
        graph.node_count(),
        graph.edge_count()
    );

    // Zero heuristic: uniform-cost search over unit weights
    let Some((cost, nodes)) = astar(
        &graph,
        source_node,
        |n| n == target_node,
        |e| *e.weight(),
        |_| 0,
    ) else {
        warn!(
            "no ancilla route from patch {} ({:?}) to patch {} ({:?})",
            source_id, source_op, target_id, target_op
        );
        return Ok(None);
    };
    trace!("shortest route costs {} over {} nodes", cost, nodes.len());

    // Both endpoints are patches, only the nodes in between become ancillas
    let interior = match nodes.len() {
        0..=2 => &[][..],
        n => &nodes[1..n - 1],
    };
    let path: Vec<Cell> = interior.iter().filter_map(|&n| graph[n]).collect();
    let region = connect_path(source.cell, &path, target.cell);
    debug!(
        "routed {}:{:?} -> {}:{:?} through {} ancilla cells",
        source_id,
        source_op,
        target_id,
        target_op,
        region.len()
    );
    Ok(Some(region))
}

/// Route a twist: an X boundary of `target` to a Z boundary of the same patch.
pub fn route_twist(slice: &Slice, target: PatchId) -> Result<Option<RoutingRegion>> {
    graph_search_route_ancilla(slice, target, PauliOperator::X, target, PauliOperator::Z)
}

fn single_cell_patch(slice: &Slice, id: PatchId) -> Result<&SingleCellPatch> {
    slice
        .get_patch_by_id(id)?
        .as_single_cell()
        .ok_or(LatticeError::UnsupportedMultiCellRouting(id))
}

fn faces(patch: &SingleCellPatch, neighbour: Cell, wanted: BoundaryType) -> bool {
    patch
        .boundary_facing(neighbour)
        .is_some_and(|b| b.boundary_type == wanted)
}

/// Turn a cell path into routing cells whose path-facing edges are connected.
fn connect_path(source: Cell, path: &[Cell], target: Cell) -> RoutingRegion {
    let cells = path
        .iter()
        .enumerate()
        .map(|(i, &cell)| {
            let prev = if i == 0 { source } else { path[i - 1] };
            let next = path.get(i + 1).copied().unwrap_or(target);
            let mut routed = SingleCellPatch::unconnected(cell);
            for neighbour in [prev, next] {
                if let Some(boundary) = routed.boundary_facing_mut(neighbour) {
                    *boundary = Boundary::connected();
                }
            }
            routed
        })
        .collect();
    RoutingRegion { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, SimpleLayout};
    use crate::patch::{MultiCellPatch, Patch, PatchCells};
    use crate::testing::FixedLayout;
    use std::sync::Arc;

    /// Patch with Smooth top/bottom and Rough left/right.
    fn rough_sided(cell: Cell, id: PatchId) -> Patch {
        let mut p = Patch::qubit(cell).with_id(id);
        p.cells = PatchCells::SingleCell(SingleCellPatch::with_boundaries(
            cell,
            BoundaryType::Smooth,
            BoundaryType::Rough,
        ));
        p
    }

    fn slice_of(patches: Vec<Patch>) -> Slice {
        Slice::from_layout(Arc::new(FixedLayout::with_patches(patches)))
    }

    fn simple_slice(n: usize, config: LayoutConfig) -> Slice {
        let mut slice = Slice::from_layout(Arc::new(SimpleLayout::with_config(n, config)));
        for (i, p) in slice.qubit_patches_mut().iter_mut().enumerate() {
            p.id = Some(i as PatchId);
        }
        slice
    }

    fn assert_contiguous(region: &RoutingRegion) {
        let cells: Vec<_> = region.path().collect();
        for pair in cells.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]), "{:?} not adjacent", pair);
        }
        for routed in &region.cells {
            let connected = routed
                .boundaries()
                .iter()
                .filter(|b| **b == Boundary::connected())
                .count();
            let none = routed
                .boundaries()
                .iter()
                .filter(|b| **b == Boundary::default())
                .count();
            assert_eq!((connected, none), (2, 2), "bad boundaries on {:?}", routed);
        }
    }

    #[test]
    fn test_straight_route_on_empty_row() {
        let slice = slice_of(vec![rough_sided(Cell::new(0, 0), 0), rough_sided(Cell::new(0, 3), 1)]);
        let region = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X)
            .unwrap()
            .expect("route exists");
        assert_eq!(region.path().collect::<Vec<_>>(), vec![Cell::new(0, 1), Cell::new(0, 2)]);
        assert_contiguous(&region);
        assert_eq!(region.cells[0].left, Boundary::connected());
        assert_eq!(region.cells[0].right, Boundary::connected());
        assert_eq!(region.cells[1].right, Boundary::connected());
        assert_eq!(region.cells[1].top, Boundary::default());
    }

    #[test]
    fn test_route_blocked_by_third_patch() {
        let slice = slice_of(vec![
            rough_sided(Cell::new(0, 0), 0),
            rough_sided(Cell::new(0, 3), 1),
            Patch::qubit(Cell::new(0, 1)),
            Patch::qubit(Cell::new(0, 2)),
        ]);
        let routed = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X);
        assert_eq!(routed, Ok(None));
    }

    #[test]
    fn test_route_requires_matching_boundaries() {
        // Standard patches only expose Smooth edges along the row
        let slice = simple_slice(2, LayoutConfig::default());
        let zz = graph_search_route_ancilla(&slice, 0, PauliOperator::Z, 1, PauliOperator::Z)
            .unwrap()
            .unwrap();
        assert_eq!(zz.path().collect::<Vec<_>>(), vec![Cell::new(0, 1)]);
        assert_contiguous(&zz);

        let xx = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X);
        assert_eq!(xx, Ok(None));
    }

    #[test]
    fn test_route_stays_inside_the_lattice() {
        // Top edges face row -1, only the bottom ones can be used
        let slice = slice_of(vec![
            Patch::qubit(Cell::new(0, 0)).with_id(0),
            Patch::qubit(Cell::new(0, 2)).with_id(1),
            Patch::qubit(Cell::new(1, 3)).with_id(2),
        ]);
        let region = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X)
            .unwrap()
            .unwrap();
        assert_eq!(
            region.path().collect::<Vec<_>>(),
            vec![Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)]
        );
        assert_contiguous(&region);
        assert_eq!(region.cells[0].top, Boundary::connected());
        assert_eq!(region.cells[2].top, Boundary::connected());
    }

    #[test]
    fn test_twist_route_has_distinct_endpoint() {
        let slice = slice_of(vec![
            Patch::qubit(Cell::new(1, 1)).with_id(4),
            Patch::qubit(Cell::new(2, 2)).with_id(5),
        ]);
        let region = route_twist(&slice, 4).unwrap().expect("twist route exists");
        assert_eq!(region.len(), 3);
        assert_contiguous(&region);

        let path: Vec<_> = region.path().collect();
        let centre = Cell::new(1, 1);
        // Leaves through a Rough (vertical) edge, returns through a Smooth one
        assert!(path[0] == Cell::new(0, 1) || path[0] == Cell::new(2, 1));
        assert!(path[2] == Cell::new(1, 0) || path[2] == Cell::new(1, 2));
        assert!(path.iter().all(|c| *c != centre && c.row >= 0 && c.col >= 0));
    }

    #[test]
    fn test_adjacent_patches_merge_directly() {
        let slice = simple_slice(2, LayoutConfig { row: 0, spacing: 1 });
        let region = graph_search_route_ancilla(&slice, 0, PauliOperator::Z, 1, PauliOperator::Z)
            .unwrap()
            .unwrap();
        assert!(region.is_empty());

        // X boundaries do not face each other
        let xx = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X);
        assert_eq!(xx, Ok(None));
    }

    #[test]
    fn test_distillation_region_blocks_route() {
        let layout = FixedLayout {
            patches: vec![rough_sided(Cell::new(0, 0), 0), rough_sided(Cell::new(0, 2), 1)],
            reserved: vec![Cell::new(0, 1)],
            distilled: Vec::new(),
        };
        let slice = Slice::from_layout(Arc::new(layout));
        let routed = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X);
        assert_eq!(routed, Ok(None));
    }

    #[test]
    fn test_precondition_errors() {
        let mut slice = simple_slice(2, LayoutConfig::default());
        assert_eq!(
            graph_search_route_ancilla(&slice, 0, PauliOperator::Y, 1, PauliOperator::Z),
            Err(LatticeError::UnsupportedOperator(PauliOperator::Y))
        );
        assert_eq!(
            graph_search_route_ancilla(&slice, 0, PauliOperator::Z, 1, PauliOperator::I),
            Err(LatticeError::UnsupportedOperator(PauliOperator::I))
        );
        assert_eq!(
            graph_search_route_ancilla(&slice, 0, PauliOperator::Z, 8, PauliOperator::Z),
            Err(LatticeError::PatchNotFound(8))
        );

        let multi = Patch {
            cells: PatchCells::MultiCell(MultiCellPatch {
                sub_cells: vec![
                    SingleCellPatch::unconnected(Cell::new(2, 0)),
                    SingleCellPatch::unconnected(Cell::new(2, 1)),
                ],
            }),
            ..Patch::qubit(Cell::new(2, 0)).with_id(7)
        };
        slice.add_qubit_patch(multi).unwrap();
        assert_eq!(
            graph_search_route_ancilla(&slice, 0, PauliOperator::Z, 7, PauliOperator::Z),
            Err(LatticeError::UnsupportedMultiCellRouting(7))
        );
    }

    #[test]
    fn test_route_ends_short_of_both_patches() {
        // Row 1: q0 at col 0, q1 at col 3, q2 at col 6; row 0 free
        let slice = simple_slice(3, LayoutConfig { row: 1, spacing: 3 });
        let region = graph_search_route_ancilla(&slice, 0, PauliOperator::Z, 2, PauliOperator::Z)
            .unwrap()
            .unwrap();
        assert_contiguous(&region);
        let path: Vec<_> = region.path().collect();
        assert_eq!(path.first(), Some(&Cell::new(1, 1)));
        assert_eq!(path.last(), Some(&Cell::new(1, 5)));
        // Detour over row 0 around q1
        assert_eq!(path.len(), 7);
        for patch in slice.qubit_patches() {
            assert!(path.iter().all(|c| !patch.occupies(*c)));
        }
    }

    #[test]
    fn test_route_goes_around_obstacles() {
        // 3x5 grid, wall in column 2 except the bottom row
        let slice = slice_of(vec![
            rough_sided(Cell::new(0, 0), 0),
            rough_sided(Cell::new(0, 4), 1),
            Patch::qubit(Cell::new(0, 2)),
            Patch::qubit(Cell::new(1, 2)),
            Patch::qubit(Cell::new(2, 4)),
        ]);
        let region = graph_search_route_ancilla(&slice, 0, PauliOperator::X, 1, PauliOperator::X)
            .unwrap()
            .unwrap();
        assert_contiguous(&region);
        let path: Vec<_> = region.path().collect();
        assert_eq!(path.first(), Some(&Cell::new(0, 1)));
        assert_eq!(path.last(), Some(&Cell::new(0, 3)));
        assert!(path.contains(&Cell::new(2, 2)));
        // (0,1) (1,1) (2,1) (2,2) (2,3) (1,3) (0,3)
        assert_eq!(path.len(), 7);
        assert!(path.iter().all(|c| slice.is_cell_free(*c)));
    }
}
