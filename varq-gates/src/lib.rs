//! Gate matrices for varq
//!
//! Only the gates needed by the classifier circuit and the entropy test
//! states live here: Paulis, Hadamard, CNOT, `RY`, the general `Rot`
//! rotation and the IsingXX coupling.
//!
//! ```
//! use varq_gates::matrices::{rot, rotation_y, CNOT};
//!
//! let ry = rotation_y(std::f64::consts::PI);
//! assert!((ry[1][0].re - 1.0).abs() < 1e-12);
//!
//! let r = rot(0.0, 0.0, 0.0);
//! assert!((r[0][0].re - 1.0).abs() < 1e-12);
//! assert_eq!(CNOT[2][3].re, 1.0);
//! ```

pub mod matrices;

pub use matrices::{Matrix2, Matrix4};
