//! One compiled timestep of the lattice.
//!
//! A slice is the complete occupancy snapshot: which qubit patches are alive
//! (and what happens to them during this step), which magic states are
//! waiting unbound, and which ancilla channels are routed. The geometry is
//! shared with every other slice of the computation through the layout
//! handle.
//!
//! All queries are linear scans over the owned patches. That is fine for the
//! tens of patches compiled today; larger lattices want an id→index map.

use std::sync::Arc;

use crate::cell::Cell;
use crate::error::{LatticeError, Result};
use crate::layout::Layout;
use crate::patch::{Patch, PatchActivity, PatchId, RoutingRegion};

/// Occupancy of the lattice during one instruction.
#[derive(Debug, Clone)]
pub struct Slice {
    qubit_patches: Vec<Patch>,
    unbound_magic_states: Vec<Patch>,
    routing_regions: Vec<RoutingRegion>,
    layout: Arc<dyn Layout>,
}

impl Slice {
    /// An empty slice over `layout`.
    pub fn new(layout: Arc<dyn Layout>) -> Self {
        Self {
            qubit_patches: Vec::new(),
            unbound_magic_states: Vec::new(),
            routing_regions: Vec::new(),
            layout,
        }
    }

    /// A slice seeded with the layout's core patches.
    pub fn from_layout(layout: Arc<dyn Layout>) -> Self {
        let mut slice = Self::new(layout);
        slice.qubit_patches = slice.layout.core_patches();
        slice
    }

    /// Geometry this slice lives on.
    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    /// Live qubit patches, in placement order.
    pub fn qubit_patches(&self) -> &[Patch] {
        &self.qubit_patches
    }

    /// Mutable view of the live qubit patches.
    pub fn qubit_patches_mut(&mut self) -> &mut [Patch] {
        &mut self.qubit_patches
    }

    /// Magic states waiting to be consumed.
    pub fn magic_states(&self) -> &[Patch] {
        &self.unbound_magic_states
    }

    /// Ancilla channels routed in this slice.
    pub fn routing_regions(&self) -> &[RoutingRegion] {
        &self.routing_regions
    }

    /// Place a qubit patch. Fails if any of its cells is taken.
    pub fn add_qubit_patch(&mut self, patch: Patch) -> Result<()> {
        self.ensure_free(&patch)?;
        self.qubit_patches.push(patch);
        Ok(())
    }

    /// Place an unbound magic state. Fails if any of its cells is taken.
    pub fn add_magic_state(&mut self, patch: Patch) -> Result<()> {
        self.ensure_free(&patch)?;
        self.unbound_magic_states.push(patch);
        Ok(())
    }

    /// Record an ancilla channel for this slice.
    pub fn add_routing_region(&mut self, region: RoutingRegion) {
        self.routing_regions.push(region);
    }

    fn ensure_free(&self, patch: &Patch) -> Result<()> {
        match patch.cells().into_iter().find(|&c| !self.is_cell_free(c)) {
            Some(cell) => Err(LatticeError::CellOccupied(cell)),
            None => Ok(()),
        }
    }

    /// Qubit patch covering `cell`.
    pub fn qubit_patch_on_cell(&self, cell: Cell) -> Option<&Patch> {
        self.qubit_patches.iter().find(|p| p.occupies(cell))
    }

    /// Unbound magic state covering `cell`.
    pub fn magic_state_on_cell(&self, cell: Cell) -> Option<&Patch> {
        self.unbound_magic_states.iter().find(|p| p.occupies(cell))
    }

    /// First qubit patch or magic state on `cell`.
    pub fn any_patch_on_cell(&self, cell: Cell) -> Option<&Patch> {
        self.qubit_patch_on_cell(cell)
            .or_else(|| self.magic_state_on_cell(cell))
    }

    /// Same as [`Slice::any_patch_on_cell`].
    pub fn patch_on_cell(&self, cell: Cell) -> Option<&Patch> {
        self.any_patch_on_cell(cell)
    }

    /// A cell is free unless reserved for distillation, covered by a live
    /// patch or already part of a routing region of this slice.
    pub fn is_cell_free(&self, cell: Cell) -> bool {
        if self
            .layout
            .distillation_regions()
            .iter()
            .any(|region| region.contains(cell))
        {
            return false;
        }
        self.any_patch_on_cell(cell).is_none()
            && !self.routing_regions.iter().any(|r| r.occupies(cell))
    }

    /// Qubit patch `id`, or `PatchNotFound`.
    pub fn get_patch_by_id(&self, id: PatchId) -> Result<&Patch> {
        self.qubit_patches
            .iter()
            .find(|p| p.id == Some(id))
            .ok_or(LatticeError::PatchNotFound(id))
    }

    /// Mutable qubit patch `id`, or `PatchNotFound`.
    pub fn get_patch_by_id_mut(&mut self, id: PatchId) -> Result<&mut Patch> {
        self.qubit_patches
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or(LatticeError::PatchNotFound(id))
    }

    /// First free cell where distillation region `region_idx` can put its state.
    pub fn find_place_for_magic_state(&self, region_idx: usize) -> Option<Cell> {
        self.layout
            .distilled_state_locations(region_idx)
            .into_iter()
            .find(|&c| self.is_cell_free(c))
    }

    /// Component-wise max over every occupied cell, never below `(0, 0)`.
    pub fn furthest_cell(&self) -> Cell {
        let patch_cells = self
            .qubit_patches
            .iter()
            .chain(self.unbound_magic_states.iter())
            .flat_map(|p| p.cells());
        let routed_cells = self.routing_regions.iter().flat_map(|r| r.path());
        patch_cells
            .chain(routed_cells)
            .fold(Cell::new(0, 0), |acc, c| acc.max_with(&c))
    }

    /// The starting point of the next slice.
    ///
    /// Measured patches are dropped and unitary activity is cleared. Routing
    /// regions and magic states are recomputed per slice and not copied.
    pub fn make_copy_with_cleared_activity(&self) -> Slice {
        let qubit_patches = self
            .qubit_patches
            .iter()
            .filter(|p| p.activity != PatchActivity::Measurement)
            .cloned()
            .map(|mut p| {
                if p.activity == PatchActivity::Unitary {
                    p.activity = PatchActivity::None;
                }
                p
            })
            .collect();

        Slice {
            qubit_patches,
            unbound_magic_states: Vec::new(),
            routing_regions: Vec::new(),
            layout: Arc::clone(&self.layout),
        }
    }

    /// Verify that no two patches share a cell.
    pub fn check_occupancy(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        let all_cells = self
            .qubit_patches
            .iter()
            .chain(self.unbound_magic_states.iter())
            .flat_map(|p| p.cells());
        for cell in all_cells {
            if !seen.insert(cell) {
                return Err(LatticeError::CellOccupied(cell));
            }
        }
        Ok(())
    }
}
