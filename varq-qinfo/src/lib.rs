//! Quantum information measures on reduced states
//!
//! Two halves:
//!
//! - [`transform`]: `vn_entropy`, `mutual_info` and `relative_entropy` built
//!   on top of a [`QNode`], evaluated through partial traces and Hermitian
//!   eigendecompositions of the returned state.
//! - [`reference`]: closed-form values and derivatives for the two-qubit
//!   IsingXX and RY+CNOT families, used to check the transforms.

pub mod device;
pub mod error;
pub mod reference;
pub mod transform;

pub use device::{Device, WireLabel, Wires};
pub use error::{ErrorClass, QinfoError, Result};
pub use transform::{
    mutual_info, relative_entropy, vn_entropy, CircuitOutput, MutualInfo, QNode,
    RelativeEntropy, TransformOptions, VnEntropy,
};
