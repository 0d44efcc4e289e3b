//! Logical input of the compiler.
//!
//! The instruction stream is produced by an external front-end. Each
//! operation refers to logical qubits by their declared [`PatchId`].

use std::collections::BTreeMap;

use crate::patch::{PatchId, PauliOperator};

/// Measure a single patch out of the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinglePatchMeasurement {
    /// Patch to measure.
    pub target: PatchId,
}

/// Apply a logical Pauli to a single patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPauli {
    /// Patch the Pauli acts on.
    pub target: PatchId,
}

/// Joint Pauli measurement over several patches, keyed by patch id.
///
/// Only two-patch observables can be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiPatchMeasurement {
    /// Operator applied to each participating patch.
    pub observable: BTreeMap<PatchId, PauliOperator>,
}

impl MultiPatchMeasurement {
    /// Collect `(id, operator)` pairs; a repeated id keeps the last operator.
    pub fn new(observable: impl IntoIterator<Item = (PatchId, PauliOperator)>) -> Self {
        Self {
            observable: observable.into_iter().collect(),
        }
    }
}

/// Request for a magic state to be delivered next to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicStateRequest {
    /// Patch that consumes the magic state.
    pub target: PatchId,
}

/// One step of a logical circuit. Each step compiles to exactly one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalOperation {
    SinglePatchMeasurement(SinglePatchMeasurement),
    LogicalPauli(LogicalPauli),
    MultiPatchMeasurement(MultiPatchMeasurement),
    MagicStateRequest(MagicStateRequest),
}

impl From<SinglePatchMeasurement> for LogicalOperation {
    fn from(op: SinglePatchMeasurement) -> Self {
        LogicalOperation::SinglePatchMeasurement(op)
    }
}

impl From<LogicalPauli> for LogicalOperation {
    fn from(op: LogicalPauli) -> Self {
        LogicalOperation::LogicalPauli(op)
    }
}

impl From<MultiPatchMeasurement> for LogicalOperation {
    fn from(op: MultiPatchMeasurement) -> Self {
        LogicalOperation::MultiPatchMeasurement(op)
    }
}

impl From<MagicStateRequest> for LogicalOperation {
    fn from(op: MagicStateRequest) -> Self {
        LogicalOperation::MagicStateRequest(op)
    }
}

/// A logical circuit over declared qubits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogicalLatticeComputation {
    /// Qubit ids, in the order they are assigned to layout patches.
    pub core_qubits: Vec<PatchId>,
    /// Steps, compiled in order.
    pub instructions: Vec<LogicalOperation>,
}

impl LogicalLatticeComputation {
    /// Circuit over `core_qubits` with no instructions yet.
    pub fn new(core_qubits: Vec<PatchId>) -> Self {
        Self {
            core_qubits,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction, builder style.
    pub fn then(mut self, op: impl Into<LogicalOperation>) -> Self {
        self.instructions.push(op.into());
        self
    }
}
