//! Training configuration
//!
//! Loaded from the `[trainer]` table of a TOML file. Every field has a
//! default, so an empty file (or no file) gives the stock run:
//!
//! ```toml
//! [trainer]
//! iterations = 200
//! batch_size = 5
//! learning_rate = 0.01
//! layers = 6
//! optimizer = "gradient-descent"
//! gradient_method = "parameter-shift"
//! seed = 42
//! ```

use crate::error::{Result, SimError};
use crate::gradient::{GradientConfig, GradientMethod};
use crate::optimizer::{OptimizerKind, DEFAULT_LEARNING_RATE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a [`Trainer`](crate::Trainer) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Number of optimizer steps
    ///
    /// Default: 200
    pub iterations: usize,

    /// Samples drawn (with replacement) per step
    ///
    /// Default: 5
    pub batch_size: usize,

    /// Default: 0.01
    pub learning_rate: f64,

    /// Rot + CNOT layers after encoding
    ///
    /// Default: 6
    pub layers: usize,

    /// Register width; the encoding fixes this at 2
    ///
    /// Default: 2
    pub qubits: usize,

    /// Standard deviation of the initial weights
    ///
    /// Default: 0.01
    pub init_scale: f64,

    /// Fraction of the dataset used for training, the rest validates
    ///
    /// Default: 0.75
    pub train_fraction: f64,

    /// If None, draws from entropy and runs are not reproducible
    ///
    /// Default: None
    pub seed: Option<u64>,

    pub optimizer: OptimizerKind,

    pub gradient_method: GradientMethod,

    /// Evaluate per-parameter gradients on the rayon pool
    ///
    /// Default: true
    pub parallel_gradients: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            batch_size: 5,
            learning_rate: DEFAULT_LEARNING_RATE,
            layers: 6,
            qubits: 2,
            init_scale: 0.01,
            train_fraction: 0.75,
            seed: None,
            optimizer: OptimizerKind::GradientDescent,
            gradient_method: GradientMethod::ParameterShift,
            parallel_gradients: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    trainer: TrainerConfig,
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document with an optional `[trainer]` table
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        file.trainer.validate()?;
        Ok(file.trainer)
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_gradient_method(mut self, method: GradientMethod) -> Self {
        self.gradient_method = method;
        self
    }

    pub fn with_parallel_gradients(mut self, enabled: bool) -> Self {
        self.parallel_gradients = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SimError::InvalidConfig("batch_size must be positive".to_string()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.layers == 0 {
            return Err(SimError::InvalidConfig("layers must be positive".to_string()));
        }
        if self.qubits != 2 {
            return Err(SimError::InvalidConfig(format!(
                "qubits must be 2 for amplitude encoding of 4 features, got {}",
                self.qubits
            )));
        }
        if !(self.init_scale.is_finite() && self.init_scale >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "init_scale must be non-negative, got {}",
                self.init_scale
            )));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "train_fraction must be in (0, 1), got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }

    pub fn gradient_config(&self) -> GradientConfig {
        GradientConfig {
            method: self.gradient_method,
            parallel: self.parallel_gradients,
            ..Default::default()
        }
    }
}
