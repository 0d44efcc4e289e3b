//! Fixtures shared by the unit tests.

use crate::cell::Cell;
use crate::layout::{DistillationRegion, Layout};
use crate::patch::{Patch, SingleCellPatch};

/// Layout with hand-picked core patches and reserved cells.
#[derive(Debug, Clone, Default)]
pub struct FixedLayout {
    pub patches: Vec<Patch>,
    pub reserved: Vec<Cell>,
    pub distilled: Vec<Cell>,
}

impl FixedLayout {
    pub fn with_patches(patches: Vec<Patch>) -> Self {
        Self { patches, ..Self::default() }
    }
}

impl Layout for FixedLayout {
    fn core_patches(&self) -> Vec<Patch> {
        self.patches.clone()
    }

    fn magic_state_queue_locations(&self) -> Vec<Cell> {
        Vec::new()
    }

    fn distillery_locations(&self) -> Vec<Cell> {
        self.reserved.first().copied().into_iter().collect()
    }

    fn distillation_regions(&self) -> Vec<DistillationRegion> {
        if self.reserved.is_empty() {
            return Vec::new();
        }
        vec![DistillationRegion {
            sub_cells: self.reserved.iter().map(|&c| SingleCellPatch::unconnected(c)).collect(),
        }]
    }

    fn distilled_state_locations(&self, region_idx: usize) -> Vec<Cell> {
        if region_idx == 0 {
            self.distilled.clone()
        } else {
            Vec::new()
        }
    }

    fn furthest_cell(&self) -> Cell {
        self.patches
            .iter()
            .flat_map(|p| p.cells())
            .chain(self.reserved.iter().copied())
            .fold(Cell::new(0, 0), |acc, c| acc.max_with(&c))
    }
}
