//! Error types for the entropy transforms

use thiserror::Error;
use varq_state::StateError;

/// Broad category of a transform error
///
/// `Value` covers bad arguments; `QuantumFunction` covers state functions
/// that cannot be combined the way the transform asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Value,
    QuantumFunction,
}

/// Errors raised while building or evaluating an entropy transform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QinfoError {
    /// A device was passed alongside a QNode that already owns one
    #[error("Cannot provide a 'device' value directly to the {transform} transform; the QNode's device is used")]
    DeviceOverride { transform: &'static str },

    /// Device wires were passed alongside a QNode that already owns a device
    #[error("Cannot provide a 'device_wires' value directly to the {transform} transform; the QNode's device wires are used")]
    DeviceWiresOverride { transform: &'static str },

    /// The state function returned something other than a state
    #[error("The qfunc return type needs to be a state.")]
    NotAState,

    /// The state function returned a matrix that is not Hermitian, unit
    /// trace and positive semi-definite
    #[error("The returned density matrix is not a valid state (trace {trace})")]
    InvalidDensityMatrix { trace: f64 },

    /// Relative entropy needs both reduced states on the same number of wires
    #[error("The two states must have the same number of wires, got {wires0} and {wires1}")]
    WireCountMismatch { wires0: usize, wires1: usize },

    #[error("Invalid logarithm base {base}, expected a finite positive value other than 1")]
    InvalidBase { base: f64 },

    #[error("Wire {wire} is not on the device")]
    UnknownWire { wire: String },

    #[error("Wire {wire} appears more than once")]
    DuplicateWire { wire: String },

    #[error("Wire subset must not be empty")]
    EmptyWires,

    /// Paired broadcast batches of different length
    #[error("Batch sizes differ: {left} and {right}")]
    BatchMismatch { left: usize, right: usize },

    #[error(transparent)]
    State(#[from] StateError),
}

impl QinfoError {
    pub fn class(&self) -> ErrorClass {
        match self {
            QinfoError::WireCountMismatch { .. } => ErrorClass::QuantumFunction,
            _ => ErrorClass::Value,
        }
    }
}

/// Result type for entropy transforms
pub type Result<T> = std::result::Result<T, QinfoError>;
