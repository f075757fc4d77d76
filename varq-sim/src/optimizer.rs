//! First-order optimizers over a flat parameter vector
//!
//! - **Gradient descent**: `p ← p - η·g`
//! - **Momentum**: `v ← μ·v + η·g`, `p ← p - v`
//! - **Adam**: bias-corrected first and second moment estimates

use crate::error::{Result, SimError};
use crate::gradient::Objective;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default learning rate for every optimizer
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// One parameter update per call
pub trait Optimizer: Send {
    /// Return the parameters after one step against `objective`
    fn step(&mut self, objective: &dyn Objective, params: &[f64]) -> Result<Vec<f64>>;

    fn learning_rate(&self) -> f64;

    /// Drop accumulated state (moments, velocity, step count)
    fn reset(&mut self);
}

fn gradient_for(objective: &dyn Objective, params: &[f64]) -> Result<Vec<f64>> {
    let gradient = objective.gradient(params)?;
    if gradient.len() != params.len() {
        return Err(SimError::ShapeMismatch {
            context: "objective gradient",
            expected: params.len(),
            actual: gradient.len(),
        });
    }
    Ok(gradient)
}

/// Plain gradient descent with a fixed step size
#[derive(Debug, Clone)]
pub struct GradientDescentOptimizer {
    learning_rate: f64,
}

impl GradientDescentOptimizer {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Default for GradientDescentOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE)
    }
}

impl Optimizer for GradientDescentOptimizer {
    fn step(&mut self, objective: &dyn Objective, params: &[f64]) -> Result<Vec<f64>> {
        let gradient = gradient_for(objective, params)?;
        Ok(params
            .iter()
            .zip(&gradient)
            .map(|(p, g)| p - self.learning_rate * g)
            .collect())
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn reset(&mut self) {}
}

/// Momentum optimizer configuration
#[derive(Debug, Clone)]
pub struct MomentumConfig {
    pub learning_rate: f64,
    /// Momentum coefficient (typically 0.9)
    pub momentum: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: 0.9,
        }
    }
}

/// Gradient descent with momentum
#[derive(Debug, Clone)]
pub struct MomentumOptimizer {
    config: MomentumConfig,
    velocity: Vec<f64>,
}

impl MomentumOptimizer {
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            config,
            velocity: Vec::new(),
        }
    }
}

impl Optimizer for MomentumOptimizer {
    fn step(&mut self, objective: &dyn Objective, params: &[f64]) -> Result<Vec<f64>> {
        let gradient = gradient_for(objective, params)?;
        if self.velocity.len() != params.len() {
            self.velocity = vec![0.0; params.len()];
        }

        let mut next = params.to_vec();
        for i in 0..next.len() {
            // v = momentum * v + learning_rate * gradient
            self.velocity[i] =
                self.config.momentum * self.velocity[i] + self.config.learning_rate * gradient[i];
            next[i] -= self.velocity[i];
        }
        Ok(next)
    }

    fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    fn reset(&mut self) {
        self.velocity.clear();
    }
}

/// Adam optimizer configuration
#[derive(Debug, Clone)]
pub struct AdamConfig {
    pub learning_rate: f64,
    /// Beta1 (exponential decay rate for first moment)
    pub beta1: f64,
    /// Beta2 (exponential decay rate for second moment)
    pub beta2: f64,
    /// Epsilon (small constant for numerical stability)
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// Adaptive Moment Estimation
#[derive(Debug, Clone)]
pub struct AdamOptimizer {
    config: AdamConfig,
    // First moment estimate
    m: Vec<f64>,
    // Second moment estimate
    v: Vec<f64>,
    t: i32,
}

impl AdamOptimizer {
    pub fn new(config: AdamConfig) -> Self {
        Self {
            config,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }
}

impl Optimizer for AdamOptimizer {
    fn step(&mut self, objective: &dyn Objective, params: &[f64]) -> Result<Vec<f64>> {
        let gradient = gradient_for(objective, params)?;
        if self.m.len() != params.len() {
            self.m = vec![0.0; params.len()];
            self.v = vec![0.0; params.len()];
            self.t = 0;
        }
        self.t += 1;

        let AdamConfig {
            learning_rate,
            beta1,
            beta2,
            epsilon,
        } = self.config;

        let mut next = params.to_vec();
        for (i, g) in gradient.into_iter().enumerate() {
            self.m[i] = beta1 * self.m[i] + (1.0 - beta1) * g;
            self.v[i] = beta2 * self.v[i] + (1.0 - beta2) * g * g;

            let m_hat = self.m[i] / (1.0 - beta1.powi(self.t));
            let v_hat = self.v[i] / (1.0 - beta2.powi(self.t));

            next[i] -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
        }
        Ok(next)
    }

    fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }
}

/// Optimizer selection for configs and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizerKind {
    #[default]
    #[serde(alias = "gd")]
    GradientDescent,
    Momentum,
    Adam,
}

impl OptimizerKind {
    pub fn build(self, learning_rate: f64) -> Box<dyn Optimizer> {
        match self {
            OptimizerKind::GradientDescent => Box::new(GradientDescentOptimizer::new(learning_rate)),
            OptimizerKind::Momentum => Box::new(MomentumOptimizer::new(MomentumConfig {
                learning_rate,
                ..Default::default()
            })),
            OptimizerKind::Adam => Box::new(AdamOptimizer::new(AdamConfig {
                learning_rate,
                ..Default::default()
            })),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptimizerKind::GradientDescent => "gradient-descent",
            OptimizerKind::Momentum => "momentum",
            OptimizerKind::Adam => "adam",
        };
        f.write_str(name)
    }
}

impl FromStr for OptimizerKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gd" | "gradient-descent" => Ok(OptimizerKind::GradientDescent),
            "momentum" => Ok(OptimizerKind::Momentum),
            "adam" => Ok(OptimizerKind::Adam),
            other => Err(SimError::InvalidConfig(format!("unknown optimizer '{}'", other))),
        }
    }
}
