//! Static lattice geometry.
//!
//! A [`Layout`] decides where the core qubit patches start out, where magic
//! states queue up and which cells belong to distillation regions. Concrete
//! hardware layouts live outside this crate; [`SimpleLayout`] is the
//! reference used by tests and the demo.

use std::fmt;

use crate::cell::{Cell, CoordinateType};
use crate::patch::{Patch, SingleCellPatch};

/// A statically reserved distillation region. Its cells are never free.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistillationRegion {
    /// Reserved cells.
    pub sub_cells: Vec<SingleCellPatch>,
}

impl DistillationRegion {
    /// True if `cell` is reserved by this region.
    pub fn contains(&self, cell: Cell) -> bool {
        self.sub_cells.iter().any(|s| s.cell == cell)
    }
}

/// Placement capability consumed by the compiler.
pub trait Layout: fmt::Debug + Send + Sync {
    /// Initial qubit placements, consumed once when the first slice is built.
    fn core_patches(&self) -> Vec<Patch>;

    fn magic_state_queue_locations(&self) -> Vec<Cell>;

    fn distillery_locations(&self) -> Vec<Cell>;

    fn distillation_regions(&self) -> Vec<DistillationRegion>;

    /// Cells where region `region_idx` deposits distilled states.
    fn distilled_state_locations(&self, region_idx: usize) -> Vec<Cell>;

    /// Largest coordinates the layout places anything at.
    fn furthest_cell(&self) -> Cell;
}

/// Configuration for [`SimpleLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Row holding the qubit patches.
    pub row: CoordinateType,
    /// Column distance between consecutive patches (1 packs them edge to edge).
    pub spacing: CoordinateType,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        // One free column between neighbours leaves room for Z⊗Z surgery.
        Self { row: 0, spacing: 2 }
    }
}

/// One row of side-by-side square qubit patches, no distillery.
#[derive(Debug, Clone)]
pub struct SimpleLayout {
    num_qubits: usize,
    config: LayoutConfig,
}

impl SimpleLayout {
    /// `num_qubits` patches with the default [`LayoutConfig`].
    pub fn new(num_qubits: usize) -> Self {
        Self::with_config(num_qubits, LayoutConfig::default())
    }

    /// `num_qubits` patches placed according to `config`.
    pub fn with_config(num_qubits: usize, config: LayoutConfig) -> Self {
        Self { num_qubits, config }
    }

    /// Placement parameters.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn placement(&self, i: usize) -> Cell {
        let i = CoordinateType::try_from(i).unwrap_or(CoordinateType::MAX);
        Cell::new(self.config.row, self.config.spacing.saturating_mul(i))
    }
}

impl Layout for SimpleLayout {
    fn core_patches(&self) -> Vec<Patch> {
        (0..self.num_qubits)
            .map(|i| Patch::qubit(self.placement(i)))
            .collect()
    }

    fn magic_state_queue_locations(&self) -> Vec<Cell> {
        (0..self.num_qubits).map(|i| self.placement(i)).collect()
    }

    fn distillery_locations(&self) -> Vec<Cell> {
        Vec::new()
    }

    fn distillation_regions(&self) -> Vec<DistillationRegion> {
        Vec::new()
    }

    fn distilled_state_locations(&self, _region_idx: usize) -> Vec<Cell> {
        Vec::new()
    }

    fn furthest_cell(&self) -> Cell {
        let last = self.num_qubits.saturating_sub(1);
        self.placement(last).max_with(&Cell::new(0, 0))
    }
}
