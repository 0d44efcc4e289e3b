//! Patches: lattice regions with classified boundaries.
//!
//! A patch is one logical qubit (or ancilla, or magic state) encoded in a
//! surface-code region. Each edge of a patch cell exposes a boundary type:
//!
//! - **Rough** boundaries terminate X-type logical operators
//! - **Smooth** boundaries terminate Z-type logical operators
//! - **Connected** marks an edge merged into an active ancilla channel
//!
//! Lattice surgery measures `X⊗X`, `Z⊗Z`, ... by merging the matching
//! boundaries of two patches through a chain of ancilla cells.

use crate::cell::Cell;
use crate::error::{LatticeError, Result};

/// Stable identifier of a logical patch.
pub type PatchId = u32;

/// Single-qubit Pauli operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauliOperator {
    I,
    X,
    Y,
    Z,
}

/// Classification of one edge of a patch cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryType {
    #[default]
    None,
    /// X-type logical boundary.
    Rough,
    /// Z-type logical boundary.
    Smooth,
    /// Part of an active routing path.
    Connected,
}

/// One edge of a patch cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Boundary {
    /// Edge classification.
    pub boundary_type: BoundaryType,
    /// True while the edge takes part in a merge.
    pub is_active: bool,
}

impl Boundary {
    /// Boundary of `boundary_type` with the given activity.
    pub const fn new(boundary_type: BoundaryType, is_active: bool) -> Self {
        Self { boundary_type, is_active }
    }

    /// An inactive boundary of the given type.
    pub const fn inactive(boundary_type: BoundaryType) -> Self {
        Self::new(boundary_type, false)
    }

    /// The `{Connected, active}` boundary used along routing paths.
    pub const fn connected() -> Self {
        Self::new(BoundaryType::Connected, true)
    }
}

/// Boundary type exposing the logical operator `op`.
///
/// X maps to Rough and Z to Smooth. I and Y have no boundary of their own.
pub fn boundary_for_operator(op: PauliOperator) -> Result<BoundaryType> {
    match op {
        PauliOperator::X => Ok(BoundaryType::Rough),
        PauliOperator::Z => Ok(BoundaryType::Smooth),
        PauliOperator::I | PauliOperator::Y => Err(LatticeError::UnsupportedOperator(op)),
    }
}

/// One cell of a patch together with its four edge boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SingleCellPatch {
    /// Edge towards `row - 1`.
    pub top: Boundary,
    /// Edge towards `row + 1`.
    pub bottom: Boundary,
    /// Edge towards `col - 1`.
    pub left: Boundary,
    /// Edge towards `col + 1`.
    pub right: Boundary,
    /// Lattice position.
    pub cell: Cell,
}

impl SingleCellPatch {
    /// Cell with every boundary `{None, inactive}`.
    pub fn unconnected(cell: Cell) -> Self {
        Self::with_boundaries(cell, BoundaryType::None, BoundaryType::None)
    }

    /// Inactive boundaries, `vertical` on top/bottom and `horizontal` on left/right.
    pub fn with_boundaries(cell: Cell, vertical: BoundaryType, horizontal: BoundaryType) -> Self {
        Self {
            top: Boundary::inactive(vertical),
            bottom: Boundary::inactive(vertical),
            left: Boundary::inactive(horizontal),
            right: Boundary::inactive(horizontal),
            cell,
        }
    }

    /// The boundary facing `neighbour`, if `neighbour` is a cardinal adjacent.
    pub fn boundary_facing(&self, neighbour: Cell) -> Option<Boundary> {
        match offset(self.cell, neighbour) {
            (-1, 0) => Some(self.top),
            (1, 0) => Some(self.bottom),
            (0, -1) => Some(self.left),
            (0, 1) => Some(self.right),
            _ => None,
        }
    }

    /// Mutable access to the boundary facing `neighbour`.
    pub fn boundary_facing_mut(&mut self, neighbour: Cell) -> Option<&mut Boundary> {
        match offset(self.cell, neighbour) {
            (-1, 0) => Some(&mut self.top),
            (1, 0) => Some(&mut self.bottom),
            (0, -1) => Some(&mut self.left),
            (0, 1) => Some(&mut self.right),
            _ => None,
        }
    }

    /// Boundaries in top, bottom, left, right order.
    pub fn boundaries(&self) -> [Boundary; 4] {
        [self.top, self.bottom, self.left, self.right]
    }
}

/// `(d_row, d_col)` from `from` to `to`, widened so extreme cells cannot overflow.
fn offset(from: Cell, to: Cell) -> (i64, i64) {
    (
        i64::from(to.row) - i64::from(from.row),
        i64::from(to.col) - i64::from(from.col),
    )
}

/// A patch spread over several cells. Routing through these is unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiCellPatch {
    /// Occupied cells with their own boundaries.
    pub sub_cells: Vec<SingleCellPatch>,
}

/// Occupancy shape of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatchCells {
    SingleCell(SingleCellPatch),
    MultiCell(MultiCellPatch),
}

/// Role of a patch on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatchType {
    #[default]
    Qubit,
    Ancilla,
    DistillationQubit,
}

/// What happens to a patch during the current slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatchActivity {
    #[default]
    None,
    /// A logical Pauli is applied; cleared on the next slice.
    Unitary,
    /// The patch is measured out; gone from the next slice.
    Measurement,
}

/// A lattice region carrying one logical qubit or magic state.
///
/// Ids are unique within a computation. Patches without an id are
/// obstacles that no instruction can address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Patch {
    /// Occupied cells and their boundaries.
    pub cells: PatchCells,
    /// Role of the patch.
    pub patch_type: PatchType,
    /// Logical id, `None` for anonymous patches.
    pub id: Option<PatchId>,
    /// What happens to the patch in the current slice.
    pub activity: PatchActivity,
}

impl Patch {
    /// Standard square qubit patch: Rough top/bottom, Smooth left/right.
    pub fn qubit(cell: Cell) -> Self {
        Self {
            cells: PatchCells::SingleCell(SingleCellPatch::with_boundaries(
                cell,
                BoundaryType::Rough,
                BoundaryType::Smooth,
            )),
            patch_type: PatchType::Qubit,
            id: None,
            activity: PatchActivity::None,
        }
    }

    /// Same patch under `id`.
    pub fn with_id(mut self, id: PatchId) -> Self {
        self.id = Some(id);
        self
    }

    /// Every cell the patch occupies.
    pub fn cells(&self) -> Vec<Cell> {
        match &self.cells {
            PatchCells::SingleCell(single) => vec![single.cell],
            PatchCells::MultiCell(multi) => multi.sub_cells.iter().map(|s| s.cell).collect(),
        }
    }

    /// A representative cell, the first one for multi-cell patches.
    pub fn a_cell(&self) -> Option<Cell> {
        match &self.cells {
            PatchCells::SingleCell(single) => Some(single.cell),
            PatchCells::MultiCell(multi) => multi.sub_cells.first().map(|s| s.cell),
        }
    }

    /// True if any cell of the patch is `cell`.
    pub fn occupies(&self, cell: Cell) -> bool {
        match &self.cells {
            PatchCells::SingleCell(single) => single.cell == cell,
            PatchCells::MultiCell(multi) => multi.sub_cells.iter().any(|s| s.cell == cell),
        }
    }

    /// The single cell, or `None` for multi-cell patches.
    pub fn as_single_cell(&self) -> Option<&SingleCellPatch> {
        match &self.cells {
            PatchCells::SingleCell(single) => Some(single),
            PatchCells::MultiCell(_) => None,
        }
    }
}

/// Ancilla channel of free cells linking two patch boundaries.
///
/// Cells are ordered from the source side to the target side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RoutingRegion {
    /// Ancilla cells in path order.
    pub cells: Vec<SingleCellPatch>,
}

impl RoutingRegion {
    /// Number of ancilla cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a direct merge of adjacent patches.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if `cell` is one of the ancilla cells.
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells.iter().any(|c| c.cell == cell)
    }

    /// Ancilla positions, source side first.
    pub fn path(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().map(|c| c.cell)
    }
}

/// Monotonic source of fresh patch ids.
///
/// Owned by the computation that hands ids out, never shared globally.
#[derive(Debug, Clone, Default)]
pub struct PatchIdAllocator {
    next: PatchId,
}

impl PatchIdAllocator {
    /// Allocator whose first id is `first`.
    pub fn starting_at(first: PatchId) -> Self {
        Self { next: first }
    }

    /// Allocator that never collides with any of `taken`.
    pub fn after<'a>(taken: impl IntoIterator<Item = &'a PatchId>) -> Self {
        let first = taken.into_iter().max().map_or(0, |max| max + 1);
        Self::starting_at(first)
    }

    /// Hand out the next id.
    pub fn allocate(&mut self) -> PatchId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`PatchIdAllocator::allocate`] returns.
    pub fn peek(&self) -> PatchId {
        self.next
    }
}
