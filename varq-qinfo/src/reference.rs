//! Closed-form entropies for two-level reduced states
//!
//! The states covered are the IsingXX family `IsingXX(θ)|00⟩` and the
//! RY+CNOT family `CNOT·(RY(θ)⊗I)|00⟩`. Both reduce on either wire to
//! `diag(cos²(θ/2), sin²(θ/2))`, so everything here is a function of that
//! eigenvalue pair. Values are in nats unless a base is given.

/// Floor applied to eigenvalues before taking logs in the entropy gradient
pub const EIGENVALUE_FLOOR: f64 = 1e-8;

/// -Σ λ ln λ over the strictly positive entries of `eigenvalues`
pub fn entropy(eigenvalues: &[f64]) -> f64 {
    -eigenvalues
        .iter()
        .filter(|&&e| e > 0.0)
        .map(|&e| e * e.ln())
        .sum::<f64>()
}

pub fn entropy_with_base(eigenvalues: &[f64], base: f64) -> f64 {
    entropy(eigenvalues) / base.ln()
}

/// `[cos²(θ/2), sin²(θ/2)]`
pub fn ising_xx_eigenvalues(theta: f64) -> [f64; 2] {
    let half = theta / 2.0;
    [half.cos().powi(2), half.sin().powi(2)]
}

pub fn ising_xx_entropy(theta: f64, base: f64) -> f64 {
    entropy_with_base(&ising_xx_eigenvalues(theta), base)
}

/// dS/dθ of the IsingXX single-wire entropy, in nats
///
/// With `c = cos²(θ/2)` and `s = sin²(θ/2)`, `dc/dθ = -sin θ / 2 = -ds/dθ`,
/// so `dS/dθ = (sin θ / 2)(ln c - ln s)`. The eigenvalues are floored at
/// [`EIGENVALUE_FLOOR`] first, which keeps the result finite at θ = kπ.
/// Divide by `ln(base)` for other bases.
pub fn entropy_gradient(theta: f64) -> f64 {
    let [c, s] = ising_xx_eigenvalues(theta);
    let c = c.max(EIGENVALUE_FLOOR);
    let s = s.max(EIGENVALUE_FLOOR);
    0.5 * theta.sin() * (c.ln() - s.ln())
}

/// Σ pᵢ (ln pᵢ - ln qᵢ), skipping every term with `pᵢ == 0`
///
/// A zero `qᵢ` under a non-zero `pᵢ` yields `+∞`.
pub fn relative_entropy(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q.iter())
        .filter(|(&pi, _)| pi != 0.0)
        .map(|(&pi, &qi)| pi * (pi.ln() - qi.ln()))
        .sum()
}

/// Single-wire eigenvalues of `CNOT·(RY(θ)⊗I)|00⟩`
pub fn ry_cnot_eigenvalues(theta: f64) -> [f64; 2] {
    ising_xx_eigenvalues(theta)
}

/// Relative entropy between single-wire reductions of two RY+CNOT states
pub fn ry_cnot_relative_entropy(theta0: f64, theta1: f64) -> f64 {
    relative_entropy(&ry_cnot_eigenvalues(theta0), &ry_cnot_eigenvalues(theta1))
}

/// Partial derivatives of [`ry_cnot_relative_entropy`] w.r.t. `(θ0, θ1)`
///
/// Singular where `tan(θ/2)` is 0 or infinite.
pub fn relative_entropy_gradient(theta0: f64, theta1: f64) -> [f64; 2] {
    let (s0, c0) = (theta0 / 2.0).sin_cos();
    let t0 = (theta0 / 2.0).tan();
    let t1 = (theta1 / 2.0).tan();

    [
        s0 * c0 * ((t0 * t0).ln() - (t1 * t1).ln()),
        c0 * c0 * t1 - s0 * s0 / t1,
    ]
}

/// I(A:B) for the IsingXX state; pure, so `S(AB) = 0` and `I = 2·S(A)`
pub fn ising_xx_mutual_info(theta: f64, base: f64) -> f64 {
    2.0 * ising_xx_entropy(theta, base)
}
