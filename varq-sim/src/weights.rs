//! Trainable parameters of the classifier

use crate::error::{Result, SimError};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// One `Rot(φ, θ, ω)` triple per qubit per layer, plus a scalar bias
///
/// Flattened as `[w(0,0,0), .., w(L-1,Q-1,2), bias]` for optimizers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTensor {
    layers: usize,
    qubits: usize,
    weights: Vec<f64>,
    bias: f64,
}

impl WeightTensor {
    /// Weights drawn from `scale · N(0, 1)`, bias 0
    pub fn random<R: Rng + ?Sized>(layers: usize, qubits: usize, scale: f64, rng: &mut R) -> Result<Self> {
        let normal =
            Normal::new(0.0, 1.0).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        let weights = (0..layers * qubits * 3)
            .map(|_| scale * normal.sample(rng))
            .collect();

        Ok(Self {
            layers,
            qubits,
            weights,
            bias: 0.0,
        })
    }

    /// Rebuild from the flat optimizer layout
    pub fn from_flat(layers: usize, qubits: usize, flat: &[f64]) -> Result<Self> {
        let expected = layers * qubits * 3 + 1;
        if flat.len() != expected {
            return Err(SimError::ShapeMismatch {
                context: "flat weight vector",
                expected,
                actual: flat.len(),
            });
        }
        let (weights, bias) = flat.split_at(expected - 1);
        Ok(Self {
            layers,
            qubits,
            weights: weights.to_vec(),
            bias: bias[0],
        })
    }

    pub fn flatten(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.weights.len() + 1);
        flat.extend_from_slice(&self.weights);
        flat.push(self.bias);
        flat
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// Circuit weights without the bias
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}
