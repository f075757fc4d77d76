//! Gradient computation for the classifier
//!
//! Circuit derivatives use the parameter shift rule
//!
//! ```text
//! ∂f/∂θ = [f(θ + s) - f(θ - s)] / (2 sin s)
//! ```
//!
//! which is exact for every `Rot` parameter since each enters through a
//! single Pauli rotation. Central finite differences are kept as a fallback
//! and as a cross-check.
//!
//! The loss derivative is chained analytically on top:
//!
//! ```text
//! L     = mean_b (y_b - f_b - bias)²
//! ∂L/∂w = mean_b -2 (y_b - f_b - bias) ∂f_b/∂w
//! ∂L/∂b = mean_b -2 (y_b - f_b - bias)
//! ```

use crate::circuit::CircuitEvaluator;
use crate::encoding::EncodingAngles;
use crate::error::{Result, SimError};
use crate::loss::square_loss;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::trace;

/// Gradient computation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientMethod {
    /// Exact, two evaluations per parameter
    #[default]
    ParameterShift,
    /// Central differences with step `epsilon`
    FiniteDifference,
}

/// Configuration for gradient computation
#[derive(Debug, Clone)]
pub struct GradientConfig {
    pub method: GradientMethod,
    /// Shift value for parameter shift rule (default: π/2)
    pub shift: f64,
    /// Epsilon for finite differences (default: 1e-7)
    pub epsilon: f64,
    /// Evaluate shifted circuits on the rayon pool
    pub parallel: bool,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            method: GradientMethod::ParameterShift,
            shift: std::f64::consts::FRAC_PI_2,
            epsilon: 1e-7,
            parallel: true,
        }
    }
}

/// Result of gradient computation
#[derive(Debug, Clone)]
pub struct GradientResult {
    /// One entry per parameter
    pub gradients: Vec<f64>,
    /// Number of circuit evaluations performed
    pub num_evaluations: usize,
    pub computation_time: Duration,
    pub method_used: GradientMethod,
}

impl GradientResult {
    pub fn as_slice(&self) -> &[f64] {
        &self.gradients
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }
}

/// Gradient of `evaluator` with respect to `weights` at fixed `angles`
pub fn circuit_gradient(
    evaluator: &dyn CircuitEvaluator,
    angles: &EncodingAngles,
    weights: &[f64],
    config: &GradientConfig,
) -> Result<GradientResult> {
    let start_time = Instant::now();
    let n_params = weights.len();

    let (delta, scale) = match config.method {
        GradientMethod::ParameterShift => (config.shift, 2.0 * config.shift.sin()),
        GradientMethod::FiniteDifference => (config.epsilon, 2.0 * config.epsilon),
    };
    if scale == 0.0 || !scale.is_finite() {
        return Err(SimError::InvalidConfig(format!(
            "{:?} step {} gives a zero denominator",
            config.method, delta
        )));
    }

    let single = |i: usize| -> Result<f64> {
        let mut shifted = weights.to_vec();
        shifted[i] = weights[i] + delta;
        let plus = evaluator.evaluate(angles, &shifted)?;
        shifted[i] = weights[i] - delta;
        let minus = evaluator.evaluate(angles, &shifted)?;
        Ok((plus - minus) / scale)
    };

    let gradients = if config.parallel {
        (0..n_params)
            .into_par_iter()
            .map(single)
            .collect::<Result<Vec<f64>>>()?
    } else {
        (0..n_params).map(single).collect::<Result<Vec<f64>>>()?
    };

    Ok(GradientResult {
        gradients,
        num_evaluations: n_params * 2,
        computation_time: start_time.elapsed(),
        method_used: config.method,
    })
}

/// A scalar function of a flat parameter vector with a gradient
pub trait Objective {
    fn num_params(&self) -> usize;

    fn value(&self, params: &[f64]) -> Result<f64>;

    fn gradient(&self, params: &[f64]) -> Result<Vec<f64>>;
}

/// Batch square loss of `circuit + bias` against ±1 labels
///
/// Parameters are laid out as `[circuit weights.., bias]`.
pub struct ClassifierObjective<'a> {
    evaluator: &'a dyn CircuitEvaluator,
    angles: &'a [EncodingAngles],
    labels: &'a [f64],
    config: &'a GradientConfig,
}

impl<'a> ClassifierObjective<'a> {
    pub fn new(
        evaluator: &'a dyn CircuitEvaluator,
        angles: &'a [EncodingAngles],
        labels: &'a [f64],
        config: &'a GradientConfig,
    ) -> Result<Self> {
        if angles.len() != labels.len() {
            return Err(SimError::ShapeMismatch {
                context: "batch labels",
                expected: angles.len(),
                actual: labels.len(),
            });
        }
        Ok(Self {
            evaluator,
            angles,
            labels,
            config,
        })
    }

    fn check_params(&self, params: &[f64]) -> Result<()> {
        if params.len() != self.num_params() {
            return Err(SimError::ShapeMismatch {
                context: "objective parameters",
                expected: self.num_params(),
                actual: params.len(),
            });
        }
        Ok(())
    }

    /// Classifier outputs for the batch
    pub fn predictions(&self, params: &[f64]) -> Result<Vec<f64>> {
        self.check_params(params)?;
        let (weights, bias) = params.split_at(params.len() - 1);
        self.angles
            .iter()
            .map(|a| Ok(self.evaluator.evaluate(a, weights)? + bias[0]))
            .collect()
    }
}

impl Objective for ClassifierObjective<'_> {
    fn num_params(&self) -> usize {
        self.evaluator.num_weights() + 1
    }

    fn value(&self, params: &[f64]) -> Result<f64> {
        square_loss(self.labels, &self.predictions(params)?)
    }

    fn gradient(&self, params: &[f64]) -> Result<Vec<f64>> {
        let predictions = self.predictions(params)?;
        let weights = &params[..params.len() - 1];
        let mut grad = vec![0.0; params.len()];
        if self.angles.is_empty() {
            return Ok(grad);
        }
        let n = self.angles.len() as f64;
        let mut evaluations = 0;
        let mut elapsed = Duration::ZERO;

        for ((angles, label), prediction) in self.angles.iter().zip(self.labels).zip(&predictions) {
            let residual = -2.0 * (label - prediction) / n;
            let circuit_grad = circuit_gradient(self.evaluator, angles, weights, self.config)?;
            for (g, dg) in grad.iter_mut().zip(circuit_grad.as_slice()) {
                *g += residual * dg;
            }
            grad[weights.len()] += residual;
            evaluations += circuit_grad.num_evaluations;
            elapsed += circuit_grad.computation_time;
        }

        trace!(
            batch = self.angles.len(),
            evaluations,
            elapsed_us = elapsed.as_micros() as u64,
            method = ?self.config.method,
            "batch gradient"
        );
        Ok(grad)
    }
}
