//! Gate matrices
//!
//! Constant matrices for the fixed gates and generators for the parametrized
//! rotations. Two-qubit matrices are written in the basis
//! {|00⟩, |01⟩, |10⟩, |11⟩} where the left bit belongs to the first qubit
//! argument of the gate.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// 2×2 gate matrix
pub type Matrix2 = [[Complex64; 2]; 2];

/// 4×4 gate matrix
pub type Matrix4 = [[Complex64; 4]; 4];

/// Hadamard gate matrix
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: Matrix2 = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

/// Pauli-X gate matrix (NOT gate)
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y gate matrix
pub const PAULI_Y: Matrix2 = [[ZERO, NEG_I], [I, ZERO]];

/// Pauli-Z gate matrix
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// CNOT gate matrix, control on the first qubit
/// CNOT = [[1, 0, 0, 0],
///         [0, 1, 0, 0],
///         [0, 0, 0, 1],
///         [0, 0, 1, 0]]
pub const CNOT: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ONE, ZERO],
];

#[inline]
fn phase_factor(angle: f64) -> Complex64 {
    Complex64::new(angle.cos(), angle.sin())
}

/// RY(θ) = [[cos(θ/2),  -sin(θ/2)],
///          [sin(θ/2),   cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> Matrix2 {
    let half_theta = theta / 2.0;
    let cos_val = half_theta.cos();
    let sin_val = half_theta.sin();

    [
        [Complex64::new(cos_val, 0.0), Complex64::new(-sin_val, 0.0)],
        [Complex64::new(sin_val, 0.0), Complex64::new(cos_val, 0.0)],
    ]
}

/// General single-qubit rotation Rot(φ, θ, ω) = RZ(ω)·RY(θ)·RZ(φ)
///
/// Rot(φ,θ,ω) = [[e^(-i(φ+ω)/2)·cos(θ/2),  -e^(i(φ-ω)/2)·sin(θ/2)],
///               [e^(-i(φ-ω)/2)·sin(θ/2),   e^(i(φ+ω)/2)·cos(θ/2)]]
///
/// Each of the three angles enters through a single Pauli rotation, so the
/// two-term parameter shift rule is exact for all of them.
#[inline]
pub fn rot(phi: f64, theta: f64, omega: f64) -> Matrix2 {
    let half_theta = theta / 2.0;
    let cos_val = half_theta.cos();
    let sin_val = half_theta.sin();
    let sum = (phi + omega) / 2.0;
    let diff = (phi - omega) / 2.0;

    [
        [phase_factor(-sum) * cos_val, -phase_factor(diff) * sin_val],
        [phase_factor(-diff) * sin_val, phase_factor(sum) * cos_val],
    ]
}

/// IsingXX(θ) = exp(-i θ/2 X⊗X)
#[inline]
pub fn ising_xx(theta: f64) -> Matrix4 {
    let half_theta = theta / 2.0;
    let cos_val = Complex64::new(half_theta.cos(), 0.0);
    let sin_val = Complex64::new(0.0, -half_theta.sin());

    [
        [cos_val, ZERO, ZERO, sin_val],
        [ZERO, cos_val, sin_val, ZERO],
        [ZERO, sin_val, cos_val, ZERO],
        [sin_val, ZERO, ZERO, cos_val],
    ]
}
