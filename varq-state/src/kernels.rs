//! Scalar gate kernels and subsystem index helpers
//!
//! Wire 0 is the most significant bit of a basis index, so on a 2-qubit
//! register `|q0 q1⟩` maps to index `2·q0 + q1`.

use crate::error::{Result, StateError};
use num_complex::Complex64;

/// Bit mask of `qubit` inside an `num_qubits`-qubit basis index
#[inline]
pub fn qubit_mask(qubit: usize, num_qubits: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

/// Check that every qubit in `qubits` exists and appears once
pub fn validate_qubits(qubits: &[usize], num_qubits: usize) -> Result<()> {
    for (i, &q) in qubits.iter().enumerate() {
        if q >= num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: q,
                num_qubits,
            });
        }
        if qubits[..i].contains(&q) {
            return Err(StateError::DuplicateQubit { index: q });
        }
    }
    Ok(())
}

/// Split a basis index into the index over `keep` (in the order given) and
/// the index over the remaining qubits (in ascending order).
pub fn split_index(index: usize, keep: &[usize], num_qubits: usize) -> (usize, usize) {
    let mut kept = 0;
    for &q in keep {
        kept = (kept << 1) | usize::from(index & qubit_mask(q, num_qubits) != 0);
    }

    let mut rest = 0;
    for q in (0..num_qubits).filter(|q| !keep.contains(q)) {
        rest = (rest << 1) | usize::from(index & qubit_mask(q, num_qubits) != 0);
    }

    (kept, rest)
}

/// Apply a single-qubit gate to amplitude pairs differing only in `qubit`
///
/// Complexity: O(2^n).
pub fn apply_single_qubit(
    state: &mut [Complex64],
    matrix: &[[Complex64; 2]; 2],
    qubit: usize,
    num_qubits: usize,
) {
    let mask = qubit_mask(qubit, num_qubits);
    let [[m00, m01], [m10, m11]] = *matrix;

    for i in 0..state.len() {
        if i & mask != 0 {
            continue;
        }
        let j = i | mask;

        let amp0 = state[i];
        let amp1 = state[j];
        state[i] = m00 * amp0 + m01 * amp1;
        state[j] = m10 * amp0 + m11 * amp1;
    }
}

/// Apply a 4×4 gate; row/column index of `matrix` is `2·bit(first) + bit(second)`
pub fn apply_two_qubit(
    state: &mut [Complex64],
    matrix: &[[Complex64; 4]; 4],
    first: usize,
    second: usize,
    num_qubits: usize,
) {
    let mask1 = qubit_mask(first, num_qubits);
    let mask2 = qubit_mask(second, num_qubits);

    for i in 0..state.len() {
        if i & (mask1 | mask2) != 0 {
            continue;
        }
        let indices = [i, i | mask2, i | mask1, i | mask1 | mask2];
        let amps = indices.map(|idx| state[idx]);

        for (row, &idx) in indices.iter().enumerate() {
            state[idx] = matrix[row]
                .iter()
                .zip(amps.iter())
                .map(|(m, a)| m * a)
                .sum();
        }
    }
}

/// CNOT as a permutation: swap target amplitudes where the control bit is set
pub fn apply_cnot(state: &mut [Complex64], control: usize, target: usize, num_qubits: usize) {
    let control_mask = qubit_mask(control, num_qubits);
    let target_mask = qubit_mask(target, num_qubits);

    for i in 0..state.len() {
        if i & control_mask != 0 && i & target_mask == 0 {
            state.swap(i, i | target_mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use varq_gates::matrices::{CNOT, PAULI_X};

    fn basis(index: usize, dimension: usize) -> Vec<Complex64> {
        let mut state = vec![Complex64::new(0.0, 0.0); dimension];
        state[index] = Complex64::new(1.0, 0.0);
        state
    }

    #[test]
    fn test_wire_zero_is_most_significant() {
        let mut state = basis(0, 4);
        apply_single_qubit(&mut state, &PAULI_X, 0, 2);
        assert_relative_eq!(state[2].re, 1.0);
    }

    #[test]
    fn test_cnot_kernel_matches_matrix() {
        for start in 0..4 {
            let mut by_swap = basis(start, 4);
            let mut by_matrix = basis(start, 4);
            apply_cnot(&mut by_swap, 0, 1, 2);
            apply_two_qubit(&mut by_matrix, &CNOT, 0, 1, 2);
            assert_eq!(by_swap, by_matrix);
        }
    }

    #[test]
    fn test_two_qubit_respects_argument_order() {
        // CNOT(1, 0) on |01⟩ gives |11⟩
        let mut state = basis(1, 4);
        apply_two_qubit(&mut state, &CNOT, 1, 0, 2);
        assert_relative_eq!(state[3].re, 1.0);
    }

    #[test]
    fn test_split_index_orders_kept_qubits() {
        // index 0b110 on 3 qubits: q0=1, q1=1, q2=0
        assert_eq!(split_index(0b110, &[2, 0], 3), (0b01, 0b1));
        assert_eq!(split_index(0b110, &[0, 2], 3), (0b10, 0b1));
    }

    #[test]
    fn test_validate_qubits() {
        assert!(validate_qubits(&[0, 1], 2).is_ok());
        assert_eq!(
            validate_qubits(&[0, 2], 2),
            Err(StateError::InvalidQubitIndex {
                index: 2,
                num_qubits: 2
            })
        );
        assert_eq!(
            validate_qubits(&[1, 1], 2),
            Err(StateError::DuplicateQubit { index: 1 })
        );
    }
}
