//! Hermitian eigendecomposition
//!
//! Cyclic complex Jacobi. Each rotation first removes the phase of the
//! pivot `a_pq` with a diagonal unitary, then zeroes the now real pivot with
//! a plane rotation. Register sizes here are tiny, so the O(n³) per sweep
//! cost does not matter.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use tracing::trace;

/// Sweep limit before giving up
pub const MAX_SWEEPS: usize = 64;

const OFF_DIAGONAL_TOLERANCE: f64 = 1e-28;

/// Eigenvalues in ascending order with matching unit eigenvectors
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    pub values: Vec<f64>,
    /// `vectors[k]` is the eigenvector for `values[k]`
    pub vectors: Vec<Vec<Complex64>>,
}

/// Diagonalize a Hermitian matrix stored row-major with side `dimension`
///
/// # Errors
/// `DimensionMismatch` if `matrix.len() != dimension²`; `NoConvergence`
/// after [`MAX_SWEEPS`] sweeps.
pub fn hermitian_eigen(matrix: &[Complex64], dimension: usize) -> Result<EigenDecomposition> {
    if matrix.len() != dimension * dimension {
        return Err(StateError::DimensionMismatch {
            expected: dimension * dimension,
            actual: matrix.len(),
        });
    }

    let n = dimension;
    let mut a = matrix.to_vec();
    let mut v = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        v[i * n + i] = Complex64::new(1.0, 0.0);
    }

    let scale = a.iter().map(|x| x.norm_sqr()).sum::<f64>().max(1.0);

    let mut converged = false;
    for sweep in 0..MAX_SWEEPS {
        let off = off_diagonal_mass(&a, n);
        if off <= OFF_DIAGONAL_TOLERANCE * scale {
            trace!(sweep, off, "jacobi converged");
            converged = true;
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                rotate(&mut a, &mut v, n, p, q);
            }
        }
    }

    if !converged && off_diagonal_mass(&a, n) > OFF_DIAGONAL_TOLERANCE * scale {
        return Err(StateError::NoConvergence { sweeps: MAX_SWEEPS });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[i * n + i].re.total_cmp(&a[j * n + j].re));

    let values = order.iter().map(|&k| a[k * n + k].re).collect();
    let vectors = order
        .iter()
        .map(|&k| (0..n).map(|row| v[row * n + k]).collect())
        .collect();

    Ok(EigenDecomposition { values, vectors })
}

fn off_diagonal_mass(a: &[Complex64], n: usize) -> f64 {
    let mut off = 0.0;
    for p in 0..n {
        for q in (p + 1)..n {
            off += 2.0 * a[p * n + q].norm_sqr();
        }
    }
    off
}

fn rotate(a: &mut [Complex64], v: &mut [Complex64], n: usize, p: usize, q: usize) {
    let apq = a[p * n + q];
    let magnitude = apq.norm();
    if magnitude == 0.0 {
        return;
    }

    let app = a[p * n + p].re;
    let aqq = a[q * n + q].re;
    let theta = (aqq - app) / (2.0 * magnitude);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    // G = diag(1, e^{-iφ}) · [[c, s], [-s, c]] restricted to the (p, q) plane
    let phase = apq.conj() / magnitude;
    let g_pp = Complex64::new(c, 0.0);
    let g_pq = Complex64::new(s, 0.0);
    let g_qp = -phase * s;
    let g_qq = phase * c;

    // A ← A·G, V ← V·G
    for k in 0..n {
        let akp = a[k * n + p];
        let akq = a[k * n + q];
        a[k * n + p] = akp * g_pp + akq * g_qp;
        a[k * n + q] = akp * g_pq + akq * g_qq;

        let vkp = v[k * n + p];
        let vkq = v[k * n + q];
        v[k * n + p] = vkp * g_pp + vkq * g_qp;
        v[k * n + q] = vkp * g_pq + vkq * g_qq;
    }

    // A ← G†·A
    for k in 0..n {
        let apk = a[p * n + k];
        let aqk = a[q * n + k];
        a[p * n + k] = g_pp.conj() * apk + g_qp.conj() * aqk;
        a[q * n + k] = g_pq.conj() * apk + g_qq.conj() * aqk;
    }

    a[p * n + q] = Complex64::new(0.0, 0.0);
    a[q * n + p] = Complex64::new(0.0, 0.0);
    a[p * n + p] = Complex64::new(a[p * n + p].re, 0.0);
    a[q * n + q] = Complex64::new(a[q * n + q].re, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_decomposition(matrix: &[Complex64], n: usize, eig: &EigenDecomposition) {
        // A·v = λ·v for each pair, and eigenvectors are orthonormal
        for (k, vec) in eig.vectors.iter().enumerate() {
            for row in 0..n {
                let av: Complex64 = (0..n).map(|col| matrix[row * n + col] * vec[col]).sum();
                let lv = vec[row] * eig.values[k];
                assert_relative_eq!(av.re, lv.re, epsilon = 1e-10);
                assert_relative_eq!(av.im, lv.im, epsilon = 1e-10);
            }
            for (l, other) in eig.vectors.iter().enumerate() {
                let dot: Complex64 = vec.iter().zip(other).map(|(x, y)| x.conj() * y).sum();
                let expected = if k == l { 1.0 } else { 0.0 };
                assert_relative_eq!(dot.re, expected, epsilon = 1e-10);
                assert_relative_eq!(dot.im, 0.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_diagonal_input() {
        let m = vec![c(0.7, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.3, 0.0)];
        let eig = hermitian_eigen(&m, 2).unwrap();
        assert_relative_eq!(eig.values[0], 0.3);
        assert_relative_eq!(eig.values[1], 0.7);
    }

    #[test]
    fn test_pauli_y_spectrum() {
        let m = vec![c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)];
        let eig = hermitian_eigen(&m, 2).unwrap();
        assert_relative_eq!(eig.values[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(eig.values[1], 1.0, epsilon = 1e-12);
        assert_decomposition(&m, 2, &eig);
    }

    #[test]
    fn test_complex_hermitian_4x4() {
        let m = vec![
            c(2.0, 0.0), c(0.5, 0.3), c(0.0, -0.2), c(0.1, 0.0),
            c(0.5, -0.3), c(1.0, 0.0), c(0.4, 0.4), c(0.0, 0.0),
            c(0.0, 0.2), c(0.4, -0.4), c(-1.0, 0.0), c(0.0, 0.7),
            c(0.1, 0.0), c(0.0, 0.0), c(0.0, -0.7), c(0.5, 0.0),
        ];
        let eig = hermitian_eigen(&m, 4).unwrap();
        assert_decomposition(&m, 4, &eig);

        let trace: f64 = eig.values.iter().sum();
        assert_relative_eq!(trace, 2.5, epsilon = 1e-10);
        assert!(eig.values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_length_mismatch() {
        let m = vec![c(1.0, 0.0); 3];
        assert_eq!(
            hermitian_eigen(&m, 2),
            Err(StateError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}
