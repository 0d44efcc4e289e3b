//! Error types for patch compilation.
//!
//! Every variant is a precondition violation in the instruction stream or in
//! the layout; compilation aborts on the first one. The router itself never
//! reports an unreachable target as an error, it returns `Ok(None)` and lets
//! the caller decide.

use thiserror::Error;

use crate::cell::Cell;
use crate::patch::{PatchId, PauliOperator};

/// Result type alias for lattice compilation.
pub type Result<T> = std::result::Result<T, LatticeError>;

/// Lattice compilation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// The layout does not provide a core patch for every declared qubit.
    #[error("Not enough patches: {required} qubits declared, layout provides {available}")]
    NotEnoughPatches {
        /// Declared logical qubits.
        required: usize,
        /// Core patches offered by the layout.
        available: usize,
    },

    /// No patch with this id lives in the slice.
    #[error("Patch {0} not found in slice")]
    PatchNotFound(PatchId),

    /// Ancilla routing only supports single-cell patches.
    #[error("Cannot route multi cell patch {0}")]
    UnsupportedMultiCellRouting(PatchId),

    /// Joint measurements are limited to two patches.
    #[error("Multi patch measurement only supports 2 patches, got {arity}")]
    UnsupportedMeasurementArity {
        /// Number of entries in the observable.
        arity: usize,
    },

    /// The operator has no matching patch boundary.
    #[error("No boundary for {0:?} operator")]
    UnsupportedOperator(PauliOperator),

    /// No free channel connects the two boundaries in this slice.
    #[error("No ancilla route from patch {source_id} to patch {target_id}")]
    RoutingInfeasible {
        /// Patch the search started from.
        source_id: PatchId,
        /// Patch the search tried to reach.
        target_id: PatchId,
    },

    /// A qubit id was declared more than once.
    #[error("Patch id {0} declared more than once")]
    DuplicatePatchId(PatchId),

    /// Two patches claim the same cell.
    #[error("Cell ({}, {}) is already occupied", .0.row, .0.col)]
    CellOccupied(Cell),
}
