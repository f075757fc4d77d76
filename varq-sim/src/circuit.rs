//! The layered classifier circuit
//!
//! After amplitude encoding each layer applies a general `Rot` to every qubit
//! and entangles with `CNOT(0, 1)`. The output is `⟨Z⟩` on qubit 0.

use crate::encoding::{prepare_state, EncodingAngles};
use crate::error::{Result, SimError};
use varq_gates::matrices::rot;
use varq_state::StateVector;

/// Differentiable circuit seen as a black box `f(angles, weights) -> ℝ`
pub trait CircuitEvaluator: Send + Sync {
    /// Length of the weight slice `evaluate` expects
    fn num_weights(&self) -> usize;

    fn evaluate(&self, angles: &EncodingAngles, weights: &[f64]) -> Result<f64>;
}

/// Rot + CNOT layers over the encoded register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationalCircuit {
    layers: usize,
    qubits: usize,
}

impl VariationalCircuit {
    /// # Errors
    /// `InvalidConfig` unless `qubits == 2` and `layers >= 1`; the encoding
    /// only addresses two qubits.
    pub fn new(layers: usize, qubits: usize) -> Result<Self> {
        if qubits != 2 {
            return Err(SimError::InvalidConfig(format!(
                "the classifier circuit needs exactly 2 qubits, got {}",
                qubits
            )));
        }
        if layers == 0 {
            return Err(SimError::InvalidConfig(
                "the classifier circuit needs at least one layer".to_string(),
            ));
        }
        Ok(Self { layers, qubits })
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// Final state for `angles` and `weights`
    pub fn state(&self, angles: &EncodingAngles, weights: &[f64]) -> Result<StateVector> {
        self.check_weights(weights)?;

        let mut state = StateVector::new(self.qubits)?;
        prepare_state(&mut state, angles)?;

        for layer in weights.chunks_exact(self.qubits * 3) {
            for (qubit, w) in layer.chunks_exact(3).enumerate() {
                state.apply_single_qubit_gate(&rot(w[0], w[1], w[2]), qubit)?;
            }
            state.apply_cnot(0, 1)?;
        }

        Ok(state)
    }

    fn check_weights(&self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.num_weights() {
            return Err(SimError::ShapeMismatch {
                context: "circuit weights",
                expected: self.num_weights(),
                actual: weights.len(),
            });
        }
        Ok(())
    }
}

impl CircuitEvaluator for VariationalCircuit {
    fn num_weights(&self) -> usize {
        self.layers * self.qubits * 3
    }

    fn evaluate(&self, angles: &EncodingAngles, weights: &[f64]) -> Result<f64> {
        Ok(self.state(angles, weights)?.expectation_z(0)?)
    }
}
