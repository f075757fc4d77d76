//! Cost and scoring helpers for ±1 labels

use crate::error::{Result, SimError};

/// Predictions within this distance of the label count as correct
pub const ACCURACY_TOLERANCE: f64 = 1e-5;

fn check_lengths(labels: &[f64], predictions: &[f64]) -> Result<()> {
    if labels.len() != predictions.len() {
        return Err(SimError::ShapeMismatch {
            context: "predictions",
            expected: labels.len(),
            actual: predictions.len(),
        });
    }
    Ok(())
}

/// Mean squared error between `labels` and `predictions`
///
/// Empty input gives 0.
///
/// # Errors
/// `ShapeMismatch` when the slices differ in length.
pub fn square_loss(labels: &[f64], predictions: &[f64]) -> Result<f64> {
    check_lengths(labels, predictions)?;
    if labels.is_empty() {
        return Ok(0.0);
    }
    let total: f64 = labels
        .iter()
        .zip(predictions)
        .map(|(l, p)| (l - p) * (l - p))
        .sum();
    Ok(total / labels.len() as f64)
}

/// Fraction of predictions within [`ACCURACY_TOLERANCE`] of their label
pub fn accuracy(labels: &[f64], predictions: &[f64]) -> Result<f64> {
    check_lengths(labels, predictions)?;
    if labels.is_empty() {
        return Ok(0.0);
    }
    let hits = labels
        .iter()
        .zip(predictions)
        .filter(|(l, p)| (*l - *p).abs() < ACCURACY_TOLERANCE)
        .count();
    Ok(hits as f64 / labels.len() as f64)
}

/// Sign with `sign(0) = 0`; NaN stays NaN
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}
