//! Compilation of a logical circuit into a sequence of slices.
//!
//! One instruction produces one slice. Each new slice starts as a copy of
//! the previous one with the previous step's activity cleared (measured
//! patches removed, unitaries reset), then the instruction marks or routes:
//!
//! | Instruction              | Effect on the new slice                       |
//! |--------------------------|-----------------------------------------------|
//! | `SinglePatchMeasurement` | target activity = Measurement                 |
//! | `LogicalPauli`           | target activity = Unitary                     |
//! | `MultiPatchMeasurement`  | ancilla routing region between the 2 patches  |
//! | `MagicStateRequest`      | nothing yet                                   |

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};

use crate::error::{LatticeError, Result};
use crate::instruction::{LogicalLatticeComputation, LogicalOperation, MultiPatchMeasurement};
use crate::layout::{Layout, SimpleLayout};
use crate::patch::{Patch, PatchActivity, PatchId, PatchIdAllocator};
use crate::routing::graph_search_route_ancilla;
use crate::slice::Slice;

/// The compiled lattice-surgery program: an ordered sequence of slices.
#[derive(Debug, Clone)]
pub struct PatchComputation {
    slices: Vec<Slice>,
    layout: Arc<dyn Layout>,
    ids: PatchIdAllocator,
}

impl PatchComputation {
    /// Compile on a [`SimpleLayout`] sized to the declared qubits.
    pub fn make(logical_computation: &LogicalLatticeComputation) -> Result<Self> {
        let layout = SimpleLayout::new(logical_computation.core_qubits.len());
        Self::make_with_layout(logical_computation, Arc::new(layout))
    }

    /// Compile on an arbitrary layout.
    pub fn make_with_layout(
        logical_computation: &LogicalLatticeComputation,
        layout: Arc<dyn Layout>,
    ) -> Result<Self> {
        let mut computation = Self::seed(&logical_computation.core_qubits, layout)?;
        info!(
            "compiling {} instructions over {} qubits",
            logical_computation.instructions.len(),
            logical_computation.core_qubits.len()
        );

        for (step, instruction) in logical_computation.instructions.iter().enumerate() {
            debug!("slice {}: {:?}", step + 1, instruction);
            computation.apply(instruction)?;
        }

        Ok(computation)
    }

    /// Build slice 0 and hand the declared ids to the first core patches.
    fn seed(core_qubits: &[PatchId], layout: Arc<dyn Layout>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(&dup) = core_qubits.iter().find(|&&id| !seen.insert(id)) {
            return Err(LatticeError::DuplicatePatchId(dup));
        }

        let mut first = Slice::from_layout(Arc::clone(&layout));
        let available = first.qubit_patches().len();
        if available < core_qubits.len() {
            return Err(LatticeError::NotEnoughPatches {
                required: core_qubits.len(),
                available,
            });
        }
        first.check_occupancy()?;

        // Patches past the declared ids stay anonymous, whatever the layout preset
        for (i, patch) in first.qubit_patches_mut().iter_mut().enumerate() {
            patch.id = core_qubits.get(i).copied();
        }
        let ids =
            PatchIdAllocator::after(first.qubit_patches().iter().filter_map(|p| p.id.as_ref()));

        Ok(Self {
            slices: vec![first],
            layout,
            ids,
        })
    }

    fn apply(&mut self, instruction: &LogicalOperation) -> Result<()> {
        let slice = self.new_slice();
        match instruction {
            LogicalOperation::SinglePatchMeasurement(m) => {
                slice.get_patch_by_id_mut(m.target)?.activity = PatchActivity::Measurement;
            }
            LogicalOperation::LogicalPauli(p) => {
                slice.get_patch_by_id_mut(p.target)?.activity = PatchActivity::Unitary;
            }
            LogicalOperation::MultiPatchMeasurement(m) => {
                route_measurement(slice, m)?;
            }
            LogicalOperation::MagicStateRequest(r) => {
                // Distillation scheduling is not compiled yet
                debug!("magic state request for patch {} left unscheduled", r.target);
            }
        }
        Ok(())
    }

    /// Number of slices, initial placement included.
    pub fn num_slices(&self) -> usize {
        self.slices.len()
    }

    /// Slice `idx`, or `None` past the end.
    pub fn slice(&self, idx: usize) -> Option<&Slice> {
        self.slices.get(idx)
    }

    /// Every slice in instruction order.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// The most recent slice.
    pub fn last_slice(&self) -> &Slice {
        // `seed` always pushes slice 0 and nothing pops
        &self.slices[self.slices.len() - 1]
    }

    /// Layout shared by every slice.
    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    /// Append a copy of the last slice with cleared activity and return it.
    pub fn new_slice(&mut self) -> &mut Slice {
        let next = self.last_slice().make_copy_with_cleared_activity();
        self.slices.push(next);
        let last = self.slices.len() - 1;
        &mut self.slices[last]
    }

    /// Place a new qubit patch in the last slice under a fresh id.
    pub fn add_qubit_patch(&mut self, mut patch: Patch) -> Result<PatchId> {
        let id = self.ids.peek();
        patch.id = Some(id);
        let last = self.slices.len() - 1;
        self.slices[last].add_qubit_patch(patch)?;
        Ok(self.ids.allocate())
    }
}

fn route_measurement(slice: &mut Slice, measurement: &MultiPatchMeasurement) -> Result<()> {
    let arity = measurement.observable.len();
    let mut pairs = measurement.observable.iter();
    let (Some((&source_id, &source_op)), Some((&target_id, &target_op)), None) =
        (pairs.next(), pairs.next(), pairs.next())
    else {
        return Err(LatticeError::UnsupportedMeasurementArity { arity });
    };

    match graph_search_route_ancilla(slice, source_id, source_op, target_id, target_op)? {
        Some(region) => {
            slice.add_routing_region(region);
            Ok(())
        }
        None => Err(LatticeError::RoutingInfeasible { source_id, target_id }),
    }
}
