//! Amplitude encoding of four real features into two qubits
//!
//! A unit feature vector `x` is loaded so that measuring `|q0 q1⟩` yields
//! basis state `i` with probability `x_i²`. The five RY angles come from the
//! relative magnitudes of the feature pairs `(x0, x1)` and `(x2, x3)`.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use varq_gates::matrices::{rotation_y, PAULI_X};
use varq_state::StateVector;

/// One dataset sample's features
pub type FeatureVector = [f64; 4];

/// Rotation angles (radians) for [`prepare_state`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodingAngles(pub [f64; 5]);

impl EncodingAngles {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|a| a.is_finite())
    }
}

/// `[-β2, β1/2, -β1/2, β0/2, -β0/2]`
///
/// ```text
/// β0 = 2·asin(|x1| / √(x0² + x1²))
/// β1 = 2·asin(|x3| / √(x2² + x3²))
/// β2 = 2·asin(√(x2² + x3²) / ‖x‖)
/// ```
///
/// A pair with zero norm carries no amplitude, so its ratio is taken as 0
/// and `[1, 0, 0, 0]` maps to all-zero angles. A zero vector still divides
/// by zero in `β2` and comes out NaN. Use [`encode`] for checked input.
pub fn derive_angles(x: &FeatureVector) -> EncodingAngles {
    let low = (x[0] * x[0] + x[1] * x[1]).sqrt();
    let high = (x[2] * x[2] + x[3] * x[3]).sqrt();
    let total = (x[0] * x[0] + x[1] * x[1] + x[2] * x[2] + x[3] * x[3]).sqrt();

    let beta0 = 2.0 * pair_ratio(x[1], low).asin();
    let beta1 = 2.0 * pair_ratio(x[3], high).asin();
    let beta2 = 2.0 * (high / total).asin();

    EncodingAngles([-beta2, beta1 / 2.0, -beta1 / 2.0, beta0 / 2.0, -beta0 / 2.0])
}

fn pair_ratio(component: f64, pair_norm: f64) -> f64 {
    if pair_norm == 0.0 {
        0.0
    } else {
        component.abs() / pair_norm
    }
}

/// Scale `x` to unit Euclidean norm
pub fn normalize(x: &FeatureVector) -> Result<FeatureVector> {
    let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(SimError::DegenerateFeatures(format!(
            "{:?} has norm {}",
            x, norm
        )));
    }
    Ok(x.map(|v| v / norm))
}

/// Normalize then derive angles, rejecting any non-finite result
pub fn encode(x: &FeatureVector) -> Result<EncodingAngles> {
    let angles = derive_angles(&normalize(x)?);
    if !angles.is_finite() {
        return Err(SimError::DegenerateFeatures(format!(
            "{:?} gives non-finite angles",
            x
        )));
    }
    Ok(angles)
}

/// Load the encoded amplitudes into qubits 0 and 1 of `state`
pub fn prepare_state(state: &mut StateVector, angles: &EncodingAngles) -> Result<()> {
    let [a0, a1, a2, a3, a4] = angles.0;

    state.apply_single_qubit_gate(&rotation_y(a0), 0)?;

    state.apply_cnot(0, 1)?;
    state.apply_single_qubit_gate(&rotation_y(a1), 1)?;
    state.apply_cnot(0, 1)?;
    state.apply_single_qubit_gate(&rotation_y(a2), 1)?;

    state.apply_single_qubit_gate(&PAULI_X, 0)?;
    state.apply_cnot(0, 1)?;
    state.apply_single_qubit_gate(&rotation_y(a3), 1)?;
    state.apply_cnot(0, 1)?;
    state.apply_single_qubit_gate(&rotation_y(a4), 1)?;
    state.apply_single_qubit_gate(&PAULI_X, 0)?;

    Ok(())
}
