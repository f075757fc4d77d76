//! Quantum state representations for small registers
//!
//! Dense state vectors and density matrices with the operations the entropy
//! transforms and the classifier circuit need: gate application, partial
//! trace onto an ordered wire subset, Hermitian eigendecomposition and the
//! `⟨Z⟩` readout.
//!
//! Basis indices are big-endian in the wire order: wire 0 is the most
//! significant bit.
//!
//! # Example
//!
//! ```
//! use varq_state::StateVector;
//! use varq_gates::matrices::HADAMARD;
//!
//! let mut bell = StateVector::new(2).unwrap();
//! bell.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
//! bell.apply_cnot(0, 1).unwrap();
//!
//! let reduced = bell.reduced_density_matrix(&[0]).unwrap();
//! let bits = reduced.von_neumann_entropy(2.0).unwrap();
//! assert!((bits - 1.0).abs() < 1e-10);
//! ```

pub mod density_matrix;
pub mod eigen;
pub mod error;
pub mod kernels;
pub mod observable;
pub mod state_vector;

pub use density_matrix::DensityMatrix;
pub use eigen::{hermitian_eigen, EigenDecomposition};
pub use error::{Result, StateError};
pub use state_vector::StateVector;
