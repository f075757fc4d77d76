//! Error types for the classifier

use thiserror::Error;
use varq_state::StateError;

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while loading data, building circuits or training
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed dataset row; line and column are 1-based
    #[error("Dataset line {line}, column {column}: {message}")]
    DatasetParse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feature vector that cannot be amplitude-encoded
    #[error("Degenerate feature vector: {0}")]
    DegenerateFeatures(String),

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("The {0} split is empty")]
    EmptySplit(&'static str),

    #[error("Training already finished after {iterations} iterations")]
    AlreadyFinished { iterations: usize },

    #[error(transparent)]
    State(#[from] StateError),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
