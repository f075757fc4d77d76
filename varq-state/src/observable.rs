//! Pauli-Z readout
//!
//! The classifier output is `⟨Z₀⟩`, computed from the Born probabilities
//! without collapsing the state.

use crate::error::Result;
use crate::state_vector::StateVector;

impl StateVector {
    /// ⟨Z⟩ on a single qubit
    pub fn expectation_z(&self, qubit: usize) -> Result<f64> {
        Ok(1.0 - 2.0 * self.probability_one(qubit)?)
    }
}
