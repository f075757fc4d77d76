//! Density matrix representation for mixed quantum states
//!
//! A density matrix ρ is a positive semi-definite, Hermitian matrix with Tr(ρ) = 1.
//! For pure states: ρ = |ψ⟩⟨ψ|
//! For mixed states: ρ = Σᵢ pᵢ |ψᵢ⟩⟨ψᵢ|
//!
//! # Key Properties
//!
//! - **Purity**: Tr(ρ²) ∈ (0, 1], equals 1 for pure states
//! - **Von Neumann Entropy**: S = -Tr(ρ log ρ), from the eigenvalues of ρ
//! - **Partial Trace**: Extract subsystem density matrices
//!
//! # Example
//!
//! ```
//! use varq_state::DensityMatrix;
//!
//! let mixed = DensityMatrix::maximally_mixed(1).unwrap();
//! assert!((mixed.purity() - 0.5).abs() < 1e-10);
//! let entropy = mixed.von_neumann_entropy(2.0).unwrap();
//! assert!((entropy - 1.0).abs() < 1e-10);
//! ```

use crate::eigen::{hermitian_eigen, EigenDecomposition};
use crate::error::{Result, StateError};
use crate::kernels;
use crate::state_vector::{StateVector, MAX_QUBITS};
use num_complex::Complex64;
use std::fmt;

/// Density matrix stored as the full 2^n × 2^n matrix in row-major order
#[derive(Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    dimension: usize,
    matrix: Vec<Complex64>,
}

impl DensityMatrix {
    /// ρ = |ψ⟩⟨ψ|
    pub fn from_state_vector(state: &StateVector) -> Self {
        let amplitudes = state.amplitudes();
        let dimension = amplitudes.len();
        let mut matrix = vec![Complex64::new(0.0, 0.0); dimension * dimension];

        for i in 0..dimension {
            for j in 0..dimension {
                matrix[i * dimension + j] = amplitudes[i] * amplitudes[j].conj();
            }
        }

        Self {
            num_qubits: state.num_qubits(),
            dimension,
            matrix,
        }
    }

    /// Wrap a row-major matrix whose side is a power of two
    ///
    /// No positivity or trace check is made here; see [`DensityMatrix::is_valid`].
    pub fn from_matrix(matrix: Vec<Complex64>) -> Result<Self> {
        let dimension = (matrix.len() as f64).sqrt().round() as usize;
        if dimension * dimension != matrix.len() || dimension < 2 || !dimension.is_power_of_two()
        {
            return Err(StateError::InvalidDimension {
                dimension: matrix.len(),
            });
        }

        Ok(Self {
            num_qubits: dimension.trailing_zeros() as usize,
            dimension,
            matrix,
        })
    }

    /// I / 2^n
    pub fn maximally_mixed(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS / 2 {
            return Err(StateError::InvalidDimension {
                dimension: 1usize.checked_shl(num_qubits as u32).unwrap_or(0),
            });
        }

        let dimension = 1usize << num_qubits;
        let mut matrix = vec![Complex64::new(0.0, 0.0); dimension * dimension];
        let diag = Complex64::new(1.0 / dimension as f64, 0.0);
        for i in 0..dimension {
            matrix[i * dimension + i] = diag;
        }

        Ok(Self {
            num_qubits,
            dimension,
            matrix,
        })
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension (2^num_qubits)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Element ρ[row, col]
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Calculate trace: Tr(ρ)
    pub fn trace(&self) -> f64 {
        (0..self.dimension).map(|i| self.get(i, i).re).sum()
    }

    /// Calculate the purity: Tr(ρ²)
    ///
    /// Returns 1 for pure states, 1/d for the maximally mixed state.
    pub fn purity(&self) -> f64 {
        let mut trace = Complex64::new(0.0, 0.0);
        for i in 0..self.dimension {
            for j in 0..self.dimension {
                trace += self.get(i, j) * self.get(j, i);
            }
        }
        trace.re
    }

    /// Check Hermiticity, unit trace and non-negative spectrum
    pub fn is_valid(&self, tolerance: f64) -> bool {
        if (self.trace() - 1.0).abs() > tolerance {
            return false;
        }

        for i in 0..self.dimension {
            for j in i..self.dimension {
                if (self.get(i, j) - self.get(j, i).conj()).norm() > tolerance {
                    return false;
                }
            }
        }

        match self.eigen() {
            Ok(eig) => eig.values.iter().all(|&v| v >= -tolerance),
            Err(_) => false,
        }
    }

    /// Reduced state on `keep`, ordered as given
    ///
    /// # Errors
    /// `InvalidDimension` for an empty `keep`, otherwise the usual qubit
    /// index and duplicate checks.
    pub fn reduce_to(&self, keep: &[usize]) -> Result<Self> {
        if keep.is_empty() {
            return Err(StateError::InvalidDimension { dimension: 0 });
        }
        kernels::validate_qubits(keep, self.num_qubits)?;

        let reduced_dim = 1usize << keep.len();
        let mut reduced = vec![Complex64::new(0.0, 0.0); reduced_dim * reduced_dim];

        let split: Vec<(usize, usize)> = (0..self.dimension)
            .map(|index| kernels::split_index(index, keep, self.num_qubits))
            .collect();

        for i in 0..self.dimension {
            let (ri, ei) = split[i];
            for j in 0..self.dimension {
                let (rj, ej) = split[j];
                if ei == ej {
                    reduced[ri * reduced_dim + rj] += self.get(i, j);
                }
            }
        }

        Ok(Self {
            num_qubits: keep.len(),
            dimension: reduced_dim,
            matrix: reduced,
        })
    }

    /// Eigenvalues (ascending) and eigenvectors of ρ
    pub fn eigen(&self) -> Result<EigenDecomposition> {
        hermitian_eigen(&self.matrix, self.dimension)
    }

    pub fn eigenvalues(&self) -> Result<Vec<f64>> {
        Ok(self.eigen()?.values)
    }

    /// S(ρ) = -Σ λ log_base λ over the strictly positive eigenvalues
    pub fn von_neumann_entropy(&self, base: f64) -> Result<f64> {
        let eigenvalues = self.eigenvalues()?;
        let nats: f64 = -eigenvalues
            .iter()
            .filter(|&&lambda| lambda > 0.0)
            .map(|&lambda| lambda * lambda.ln())
            .sum::<f64>();
        Ok(nats / base.ln())
    }
}

impl fmt::Debug for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DensityMatrix {{ qubits: {}, dim: {}, purity: {:.4} }}",
            self.num_qubits,
            self.dimension,
            self.purity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, LN_2};
    use varq_gates::matrices::{ising_xx, rotation_y, HADAMARD};

    const TOL: f64 = 1e-10;

    fn ising_state(theta: f64) -> StateVector {
        let mut state = StateVector::new(2).unwrap();
        state.apply_two_qubit_gate(&ising_xx(theta), 0, 1).unwrap();
        state
    }

    #[test]
    fn test_from_state_vector_is_pure() {
        let dm = DensityMatrix::from_state_vector(&ising_state(0.9));
        assert_relative_eq!(dm.purity(), 1.0, epsilon = TOL);
        assert_relative_eq!(dm.trace(), 1.0, epsilon = TOL);
        assert!(dm.is_valid(TOL));
    }

    #[test]
    fn test_from_matrix_rejects_non_square() {
        let matrix = vec![Complex64::new(0.0, 0.0); 6];
        assert!(DensityMatrix::from_matrix(matrix).is_err());
        let scalar = vec![Complex64::new(1.0, 0.0)];
        assert!(DensityMatrix::from_matrix(scalar).is_err());
    }

    #[test]
    fn test_maximally_mixed() {
        let dm = DensityMatrix::maximally_mixed(2).unwrap();
        assert_relative_eq!(dm.trace(), 1.0, epsilon = TOL);
        assert_relative_eq!(dm.purity(), 0.25, epsilon = TOL);
        assert_relative_eq!(dm.von_neumann_entropy(2.0).unwrap(), 2.0, epsilon = TOL);
        assert_relative_eq!(dm.von_neumann_entropy(E).unwrap(), 2.0 * LN_2, epsilon = TOL);
    }

    #[test]
    fn test_is_valid_rejects_negative_spectrum() {
        // Unit trace, Hermitian, non-negative diagonal but eigenvalues 1.5 and -0.5
        let m = vec![
            Complex64::new(0.5, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.5, 0.0),
        ];
        let dm = DensityMatrix::from_matrix(m).unwrap();
        assert!(!dm.is_valid(TOL));
    }

    #[test]
    fn test_reduce_to_of_ising_state() {
        let theta = 1.1;
        let full = DensityMatrix::from_state_vector(&ising_state(theta));
        let reduced = full.reduce_to(&[0]).unwrap();
        assert_eq!(reduced.num_qubits(), 1);
        assert_relative_eq!(reduced.get(0, 0).re, (theta / 2.0).cos().powi(2), epsilon = TOL);
        assert_relative_eq!(reduced.get(1, 1).re, (theta / 2.0).sin().powi(2), epsilon = TOL);
    }

    #[test]
    fn test_reduce_to_matches_state_vector_reduction() {
        let mut state = StateVector::new(3).unwrap();
        state.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        state.apply_cnot(0, 2).unwrap();
        state.apply_single_qubit_gate(&rotation_y(0.4), 1).unwrap();

        let from_dm = DensityMatrix::from_state_vector(&state)
            .reduce_to(&[2, 1])
            .unwrap();
        let from_sv = state.reduced_density_matrix(&[2, 1]).unwrap();
        for (a, b) in from_dm.matrix().iter().zip(from_sv.matrix()) {
            assert_relative_eq!(a.re, b.re, epsilon = TOL);
            assert_relative_eq!(a.im, b.im, epsilon = TOL);
        }
    }

    #[test]
    fn test_reduce_to_rejects_duplicates() {
        let dm = DensityMatrix::maximally_mixed(2).unwrap();
        assert_eq!(
            dm.reduce_to(&[0, 0]),
            Err(StateError::DuplicateQubit { index: 0 })
        );
        assert!(dm.reduce_to(&[]).is_err());
    }

    #[test]
    fn test_entropy_of_reduced_ising_state() {
        let theta = 0.7;
        let reduced = ising_state(theta).reduced_density_matrix(&[0]).unwrap();
        let c = (theta / 2.0).cos().powi(2);
        let s = (theta / 2.0).sin().powi(2);
        let expected = -(c * c.ln() + s * s.ln());
        assert_relative_eq!(reduced.von_neumann_entropy(E).unwrap(), expected, epsilon = TOL);
    }
}
