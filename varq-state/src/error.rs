//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Invalid state dimension
    #[error("Invalid state dimension {dimension}, expected power of 2")]
    InvalidDimension { dimension: usize },

    /// State not normalized
    #[error("State vector not normalized, norm = {norm}")]
    NotNormalized { norm: f64 },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The same qubit was named twice where distinct qubits are required
    #[error("Qubit {index} appears more than once")]
    DuplicateQubit { index: usize },

    /// Jacobi sweeps did not reduce the off-diagonal mass below tolerance
    #[error("Eigendecomposition did not converge after {sweeps} sweeps")]
    NoConvergence { sweeps: usize },
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
