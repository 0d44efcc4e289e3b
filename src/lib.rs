//! # lattice-surgery-compiler
//!
//! Compiles a logical circuit into lattice-surgery slices for surface-code
//! patches on a 2D grid.
//!
//! Every logical qubit is a square patch whose edges expose **rough**
//! (X-type) or **smooth** (Z-type) boundaries. A two-qubit joint measurement
//! such as `X⊗X` merges matching boundaries of the two patches through a
//! channel of free ancilla cells. The compiler emits one slice per
//! instruction; each slice is a full snapshot of which patches are alive,
//! what happens to them during the step, and where ancillas are routed.
//!
//! ```text
//!  slice k               slice k+1              slice k+2
//!  ┌──┐   ┌──┐           ┌──┐ ═ ┌──┐            ┌──┐
//!  │q0│   │q1│   Z⊗Z →   │q0│═══│q1│   M(q1) →  │q0│
//!  └──┘   └──┘           └──┘ ═ └──┘            └──┘
//! ```
//!
//! ## Example
//!
//! ```
//! use lattice_surgery_compiler::prelude::*;
//!
//! let program = LogicalLatticeComputation::new(vec![0, 1])
//!     .then(MultiPatchMeasurement::new([(0, PauliOperator::Z), (1, PauliOperator::Z)]))
//!     .then(SinglePatchMeasurement { target: 1 });
//!
//! let compiled = PatchComputation::make(&program)?;
//! assert_eq!(compiled.num_slices(), 3);
//! assert_eq!(compiled.slice(1).unwrap().routing_regions().len(), 1);
//! # Ok::<(), LatticeError>(())
//! ```

pub mod cell;
pub mod patch;
pub mod layout;
pub mod slice;
pub mod routing;
pub mod instruction;
pub mod computation;
pub mod error;

#[cfg(test)]
mod testing;

pub use computation::PatchComputation;
pub use error::{LatticeError, Result};

pub mod prelude {
    pub use crate::cell::*;
    pub use crate::patch::*;
    pub use crate::layout::*;
    pub use crate::slice::*;
    pub use crate::routing::*;
    pub use crate::instruction::*;
    pub use crate::computation::*;
    pub use crate::error::LatticeError;
}
