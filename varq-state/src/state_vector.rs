//! Dense state vector for small registers

use crate::density_matrix::DensityMatrix;
use crate::error::{Result, StateError};
use crate::kernels::{self, qubit_mask};
use num_complex::Complex64;

/// Largest register a dense vector is allowed to hold
pub const MAX_QUBITS: usize = 24;

/// Pure quantum state stored as 2^n complex amplitudes
///
/// Basis indices put wire 0 in the most significant bit.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Create a new state vector initialized to |0...0⟩
    ///
    /// # Errors
    /// Returns error for zero qubits or more than [`MAX_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(StateError::InvalidDimension {
                dimension: 1usize.checked_shl(num_qubits as u32).unwrap_or(0),
            });
        }

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);

        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension (2^num_qubits)
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Euclidean norm ‖ψ‖
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Unit norm within `tolerance`
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm() - 1.0).abs() <= tolerance
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Apply a 2×2 unitary to `qubit`
    pub fn apply_single_qubit_gate(
        &mut self,
        matrix: &[[Complex64; 2]; 2],
        qubit: usize,
    ) -> Result<()> {
        self.check_qubit(qubit)?;
        kernels::apply_single_qubit(&mut self.amplitudes, matrix, qubit, self.num_qubits);
        Ok(())
    }

    /// Apply a 4×4 unitary; `first` is the high bit of the matrix index
    pub fn apply_two_qubit_gate(
        &mut self,
        matrix: &[[Complex64; 4]; 4],
        first: usize,
        second: usize,
    ) -> Result<()> {
        kernels::validate_qubits(&[first, second], self.num_qubits)?;
        kernels::apply_two_qubit(&mut self.amplitudes, matrix, first, second, self.num_qubits);
        Ok(())
    }

    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        kernels::validate_qubits(&[control, target], self.num_qubits)?;
        kernels::apply_cnot(&mut self.amplitudes, control, target, self.num_qubits);
        Ok(())
    }

    /// Born-rule probabilities of each basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Probability of measuring `qubit` in |1⟩
    pub fn probability_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = qubit_mask(qubit, self.num_qubits);
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Reduced state on `keep`, tracing out every other qubit
    ///
    /// The reduced basis follows the order of `keep`, so `[1, 0]` yields the
    /// swapped two-qubit state.
    pub fn reduced_density_matrix(&self, keep: &[usize]) -> Result<DensityMatrix> {
        if keep.is_empty() {
            return Err(StateError::InvalidDimension { dimension: 0 });
        }
        kernels::validate_qubits(keep, self.num_qubits)?;

        let reduced_dim = 1usize << keep.len();
        let env_dim = self.dimension() / reduced_dim;

        // ψ reshaped as a reduced_dim × env_dim matrix, ρ = M·M†
        let mut reshaped = vec![Complex64::new(0.0, 0.0); self.dimension()];
        for (index, &amp) in self.amplitudes.iter().enumerate() {
            let (kept, rest) = kernels::split_index(index, keep, self.num_qubits);
            reshaped[kept * env_dim + rest] = amp;
        }

        let mut matrix = vec![Complex64::new(0.0, 0.0); reduced_dim * reduced_dim];
        for i in 0..reduced_dim {
            for j in i..reduced_dim {
                let row_i = &reshaped[i * env_dim..(i + 1) * env_dim];
                let row_j = &reshaped[j * env_dim..(j + 1) * env_dim];
                let value: Complex64 = row_i
                    .iter()
                    .zip(row_j.iter())
                    .map(|(a, b)| a * b.conj())
                    .sum();
                matrix[i * reduced_dim + j] = value;
                matrix[j * reduced_dim + i] = value.conj();
            }
        }

        DensityMatrix::from_matrix(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use varq_gates::matrices::{rotation_y, HADAMARD, PAULI_X};

    fn bell_state() -> StateVector {
        let mut state = StateVector::new(2).unwrap();
        state.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        state.apply_cnot(0, 1).unwrap();
        state
    }

    #[test]
    fn test_new_state_is_zero() {
        let state = StateVector::new(3).unwrap();
        assert_eq!(state.dimension(), 8);
        assert_relative_eq!(state.amplitudes()[0].re, 1.0);
        assert!(state.is_normalized(1e-12));
    }

    #[test]
    fn test_new_rejects_zero_qubits() {
        assert!(StateVector::new(0).is_err());
        assert!(StateVector::new(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_is_normalized_after_gates() {
        let mut state = bell_state();
        state.apply_single_qubit_gate(&rotation_y(0.3), 1).unwrap();
        assert!(state.is_normalized(1e-12));
        assert_relative_eq!(state.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bell_probabilities() {
        let probs = bell_state().probabilities();
        assert_relative_eq!(probs[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(probs[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(probs[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(probs[3], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_gate_on_missing_qubit() {
        let mut state = StateVector::new(2).unwrap();
        assert!(state.apply_single_qubit_gate(&PAULI_X, 2).is_err());
        assert!(state.apply_cnot(1, 1).is_err());
    }

    #[test]
    fn test_probability_one() {
        let mut state = StateVector::new(2).unwrap();
        state.apply_single_qubit_gate(&rotation_y(1.0), 1).unwrap();
        assert_relative_eq!(
            state.probability_one(1).unwrap(),
            (0.5f64).sin().powi(2),
            epsilon = 1e-12
        );
        assert_relative_eq!(state.probability_one(0).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reduced_bell_state_is_maximally_mixed() {
        let reduced = bell_state().reduced_density_matrix(&[0]).unwrap();
        assert_eq!(reduced.num_qubits(), 1);
        assert_relative_eq!(reduced.get(0, 0).re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(reduced.get(1, 1).re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(reduced.get(0, 1).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reduced_product_state_keeps_order() {
        // |0⟩ ⊗ |1⟩ reduced onto [1, 0] is |1⟩ ⊗ |0⟩
        let mut state = StateVector::new(2).unwrap();
        state.apply_single_qubit_gate(&PAULI_X, 1).unwrap();
        let swapped = state.reduced_density_matrix(&[1, 0]).unwrap();
        assert_relative_eq!(swapped.get(2, 2).re, 1.0, epsilon = 1e-12);
    }
}
