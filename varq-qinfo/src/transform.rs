//! Entropy transforms over state-returning functions
//!
//! A [`QNode`] binds a parametrized state function to the [`Device`] it runs
//! on. The transforms take a QNode plus wire subsets and return a callable
//! measure: evaluate it at one parameter vector, broadcast it over a batch,
//! or take its gradient by central finite differences.
//!
//! ```
//! use varq_gates::matrices::ising_xx;
//! use varq_qinfo::{vn_entropy, CircuitOutput, Device, QNode, TransformOptions, Wires};
//! use varq_state::StateVector;
//!
//! let qnode = QNode::new(Device::new(2), |params: &[f64]| {
//!     let mut state = StateVector::new(2)?;
//!     state.apply_two_qubit_gate(&ising_xx(params[0]), 0, 1)?;
//!     Ok(CircuitOutput::StateVector(state))
//! });
//!
//! let options = TransformOptions::default().with_base(2.0);
//! let entropy = vn_entropy(&qnode, &Wires::from([0]), &options).unwrap();
//! let bits = entropy.evaluate(&[std::f64::consts::FRAC_PI_2]).unwrap();
//! assert!((bits - 1.0).abs() < 1e-10);
//! ```

use crate::device::{Device, Wires};
use crate::error::{QinfoError, Result};
use num_complex::Complex64;
use std::f64::consts::E;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use varq_state::{DensityMatrix, StateError, StateVector};

/// Step used by the finite-difference gradients
pub const FINITE_DIFF_STEP: f64 = 1e-5;

/// Tolerance for the checks on returned states
pub const STATE_TOLERANCE: f64 = 1e-8;

/// What a state function hands back
#[derive(Debug, Clone)]
pub enum CircuitOutput {
    StateVector(StateVector),
    DensityMatrix(DensityMatrix),
    /// A measured expectation value; the entropy transforms reject it
    Expectation(f64),
}

type StateFn = dyn Fn(&[f64]) -> std::result::Result<CircuitOutput, StateError> + Send + Sync;

/// A state function bound to its device
#[derive(Clone)]
pub struct QNode {
    device: Device,
    func: Arc<StateFn>,
}

impl QNode {
    pub fn new<F>(device: Device, func: F) -> Self
    where
        F: Fn(&[f64]) -> std::result::Result<CircuitOutput, StateError> + Send + Sync + 'static,
    {
        Self {
            device,
            func: Arc::new(func),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Run the state function and check the returned state fits the device
    ///
    /// # Errors
    /// `NotNormalized` for a state vector off the unit sphere and
    /// `InvalidDensityMatrix` for a matrix that is not a density operator.
    pub fn execute(&self, params: &[f64]) -> Result<CircuitOutput> {
        let output = (self.func)(params)?;
        let num_qubits = match &output {
            CircuitOutput::StateVector(state) => {
                if !state.is_normalized(STATE_TOLERANCE) {
                    return Err(StateError::NotNormalized { norm: state.norm() }.into());
                }
                state.num_qubits()
            },
            CircuitOutput::DensityMatrix(rho) => {
                if !rho.is_valid(STATE_TOLERANCE) {
                    return Err(QinfoError::InvalidDensityMatrix { trace: rho.trace() });
                }
                rho.num_qubits()
            },
            CircuitOutput::Expectation(_) => return Ok(output),
        };
        if num_qubits != self.device.num_wires() {
            return Err(StateError::DimensionMismatch {
                expected: self.device.num_wires(),
                actual: num_qubits,
            }
            .into());
        }
        Ok(output)
    }
}

impl fmt::Debug for QNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QNode")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// Options shared by all transforms
///
/// `device` and `device_wires` exist only so callers that pass them get a
/// clear error: the QNode already fixes both.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Logarithm base, natural log when `None`
    pub base: Option<f64>,
    pub device: Option<Device>,
    pub device_wires: Option<Wires>,
}

impl TransformOptions {
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    fn validate(&self, transform: &'static str) -> Result<f64> {
        if self.device.is_some() {
            return Err(QinfoError::DeviceOverride { transform });
        }
        if self.device_wires.is_some() {
            return Err(QinfoError::DeviceWiresOverride { transform });
        }

        let base = self.base.unwrap_or(E);
        if !base.is_finite() || base <= 0.0 || base == 1.0 {
            return Err(QinfoError::InvalidBase { base });
        }
        Ok(base)
    }
}

fn reduced_state(output: &CircuitOutput, positions: &[usize]) -> Result<DensityMatrix> {
    match output {
        CircuitOutput::StateVector(state) => Ok(state.reduced_density_matrix(positions)?),
        CircuitOutput::DensityMatrix(rho) => Ok(rho.reduce_to(positions)?),
        CircuitOutput::Expectation(_) => Err(QinfoError::NotAState),
    }
}

fn subsystem_entropy(output: &CircuitOutput, positions: &[usize], base: f64) -> Result<f64> {
    match output {
        // pure over the whole register
        CircuitOutput::StateVector(state) if positions.len() == state.num_qubits() => Ok(0.0),
        _ => Ok(reduced_state(output, positions)?.von_neumann_entropy(base)?),
    }
}

/// Σᵢ pᵢ ln pᵢ - Σᵢⱼ pᵢ |⟨uᵢ|vⱼ⟩|² ln qⱼ, in nats
fn quantum_relative_entropy(rho: &DensityMatrix, sigma: &DensityMatrix) -> Result<f64> {
    let p = rho.eigen()?;
    let q = sigma.eigen()?;

    let mut value = 0.0;
    for (&pi, ui) in p.values.iter().zip(&p.vectors) {
        if pi <= 0.0 {
            continue;
        }
        value += pi * pi.ln();

        for (&qj, vj) in q.values.iter().zip(&q.vectors) {
            let overlap: Complex64 = ui.iter().zip(vj).map(|(a, b)| a.conj() * b).sum();
            let weight = pi * overlap.norm_sqr();
            if weight == 0.0 {
                continue;
            }
            if qj <= 0.0 {
                return Ok(f64::INFINITY);
            }
            value -= weight * qj.ln();
        }
    }
    Ok(value)
}

fn central_difference<F>(params: &[f64], step: f64, f: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64]) -> Result<f64>,
{
    let mut shifted = params.to_vec();
    let mut gradient = Vec::with_capacity(params.len());

    for i in 0..params.len() {
        shifted[i] = params[i] + step;
        let plus = f(&shifted)?;
        shifted[i] = params[i] - step;
        let minus = f(&shifted)?;
        shifted[i] = params[i];

        gradient.push((plus - minus) / (2.0 * step));
    }
    Ok(gradient)
}

/// Von Neumann entropy of the reduced state on a wire subset
#[derive(Debug, Clone)]
pub struct VnEntropy<'a> {
    qnode: &'a QNode,
    positions: Vec<usize>,
    base: f64,
    step: f64,
}

/// Build the Von Neumann entropy transform of `qnode` on `wires`
pub fn vn_entropy<'a>(
    qnode: &'a QNode,
    wires: &Wires,
    options: &TransformOptions,
) -> Result<VnEntropy<'a>> {
    let base = options.validate("vn_entropy")?;
    let positions = qnode.device().positions(wires)?;
    debug!(%wires, base, "vn_entropy transform");

    Ok(VnEntropy {
        qnode,
        positions,
        base,
        step: FINITE_DIFF_STEP,
    })
}

impl<'a> VnEntropy<'a> {
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn evaluate(&self, params: &[f64]) -> Result<f64> {
        let output = self.qnode.execute(params)?;
        subsystem_entropy(&output, &self.positions, self.base)
    }

    /// Evaluate once per parameter vector in `batch`
    pub fn broadcast<P: AsRef<[f64]>>(&self, batch: &[P]) -> Result<Vec<f64>> {
        batch.iter().map(|p| self.evaluate(p.as_ref())).collect()
    }

    pub fn gradient(&self, params: &[f64]) -> Result<Vec<f64>> {
        central_difference(params, self.step, |p| self.evaluate(p))
    }
}

/// I(A:B) = S(A) + S(B) - S(AB)
#[derive(Debug, Clone)]
pub struct MutualInfo<'a> {
    qnode: &'a QNode,
    positions0: Vec<usize>,
    positions1: Vec<usize>,
    joint: Vec<usize>,
    base: f64,
    step: f64,
}

/// Build the mutual information transform between two disjoint wire subsets
pub fn mutual_info<'a>(
    qnode: &'a QNode,
    wires0: &Wires,
    wires1: &Wires,
    options: &TransformOptions,
) -> Result<MutualInfo<'a>> {
    let base = options.validate("mutual_info")?;
    let device = qnode.device();
    let positions0 = device.positions(wires0)?;
    let positions1 = device.positions(wires1)?;

    let joint_wires: Wires = wires0.iter().chain(wires1.iter()).cloned().collect();
    let joint = device.positions(&joint_wires)?;
    debug!(%wires0, %wires1, base, "mutual_info transform");

    Ok(MutualInfo {
        qnode,
        positions0,
        positions1,
        joint,
        base,
        step: FINITE_DIFF_STEP,
    })
}

impl<'a> MutualInfo<'a> {
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn evaluate(&self, params: &[f64]) -> Result<f64> {
        let output = self.qnode.execute(params)?;
        let s0 = subsystem_entropy(&output, &self.positions0, self.base)?;
        let s1 = subsystem_entropy(&output, &self.positions1, self.base)?;
        let s01 = subsystem_entropy(&output, &self.joint, self.base)?;
        Ok(s0 + s1 - s01)
    }

    pub fn broadcast<P: AsRef<[f64]>>(&self, batch: &[P]) -> Result<Vec<f64>> {
        batch.iter().map(|p| self.evaluate(p.as_ref())).collect()
    }

    pub fn gradient(&self, params: &[f64]) -> Result<Vec<f64>> {
        central_difference(params, self.step, |p| self.evaluate(p))
    }
}

/// S(ρ‖σ) between reduced states of two QNodes
#[derive(Debug, Clone)]
pub struct RelativeEntropy<'a> {
    qnode0: &'a QNode,
    qnode1: &'a QNode,
    positions0: Vec<usize>,
    positions1: Vec<usize>,
    base: f64,
    step: f64,
}

/// Build the relative entropy transform
///
/// # Errors
/// `WireCountMismatch` when the subsets differ in size, before either QNode
/// is run.
pub fn relative_entropy<'a>(
    qnode0: &'a QNode,
    qnode1: &'a QNode,
    wires0: &Wires,
    wires1: &Wires,
    options: &TransformOptions,
) -> Result<RelativeEntropy<'a>> {
    let base = options.validate("relative_entropy")?;
    if wires0.len() != wires1.len() {
        return Err(QinfoError::WireCountMismatch {
            wires0: wires0.len(),
            wires1: wires1.len(),
        });
    }
    let positions0 = qnode0.device().positions(wires0)?;
    let positions1 = qnode1.device().positions(wires1)?;
    debug!(%wires0, %wires1, base, "relative_entropy transform");

    Ok(RelativeEntropy {
        qnode0,
        qnode1,
        positions0,
        positions1,
        base,
        step: FINITE_DIFF_STEP,
    })
}

impl<'a> RelativeEntropy<'a> {
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn evaluate(&self, params0: &[f64], params1: &[f64]) -> Result<f64> {
        let rho = reduced_state(&self.qnode0.execute(params0)?, &self.positions0)?;
        let sigma = reduced_state(&self.qnode1.execute(params1)?, &self.positions1)?;
        Ok(quantum_relative_entropy(&rho, &sigma)? / self.base.ln())
    }

    /// Evaluate pairwise over two batches of equal length
    pub fn broadcast<P: AsRef<[f64]>>(&self, batch0: &[P], batch1: &[P]) -> Result<Vec<f64>> {
        if batch0.len() != batch1.len() {
            return Err(QinfoError::BatchMismatch {
                left: batch0.len(),
                right: batch1.len(),
            });
        }
        batch0
            .iter()
            .zip(batch1)
            .map(|(p0, p1)| self.evaluate(p0.as_ref(), p1.as_ref()))
            .collect()
    }

    /// Partial derivatives w.r.t. `params0` and `params1`
    pub fn gradient(&self, params0: &[f64], params1: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        let grad0 = central_difference(params0, self.step, |p| self.evaluate(p, params1))?;
        let grad1 = central_difference(params1, self.step, |p| self.evaluate(params0, p))?;
        Ok((grad0, grad1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use varq_gates::matrices::{rotation_y, PAULI_X};

    fn ry_cnot() -> QNode {
        QNode::new(Device::new(2), |params: &[f64]| {
            let mut state = StateVector::new(2)?;
            state.apply_single_qubit_gate(&rotation_y(params[0]), 0)?;
            state.apply_cnot(0, 1)?;
            Ok(CircuitOutput::StateVector(state))
        })
    }

    #[test]
    fn test_options_validation_order() {
        let options = TransformOptions {
            device: Some(Device::new(2)),
            device_wires: Some(Wires::range(2)),
            ..Default::default()
        };
        assert_eq!(
            options.validate("vn_entropy"),
            Err(QinfoError::DeviceOverride {
                transform: "vn_entropy"
            })
        );
    }

    #[test]
    fn test_invalid_bases() {
        for base in [0.0, -2.0, 1.0, f64::NAN, f64::INFINITY] {
            let options = TransformOptions::default().with_base(base);
            assert!(matches!(
                options.validate("vn_entropy"),
                Err(QinfoError::InvalidBase { .. })
            ));
        }
    }

    #[test]
    fn test_execute_rejects_wrong_register() {
        let qnode = QNode::new(Device::new(3), |_: &[f64]| {
            Ok(CircuitOutput::StateVector(StateVector::new(2)?))
        });
        assert!(matches!(
            qnode.execute(&[]),
            Err(QinfoError::State(StateError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_execute_rejects_invalid_density_matrix() {
        // unit trace and Hermitian, eigenvalues 1.5 and -0.5
        let qnode = QNode::new(Device::new(1), |_: &[f64]| {
            let half = Complex64::new(0.5, 0.0);
            let one = Complex64::new(1.0, 0.0);
            Ok(CircuitOutput::DensityMatrix(DensityMatrix::from_matrix(vec![half, one, one, half])?))
        });
        assert!(matches!(
            qnode.execute(&[]),
            Err(QinfoError::InvalidDensityMatrix { .. })
        ));

        let entropy = vn_entropy(&qnode, &Wires::from([0]), &TransformOptions::default()).unwrap();
        assert!(entropy.evaluate(&[]).is_err());
    }

    #[test]
    fn test_execute_accepts_mixed_state() {
        let qnode = QNode::new(Device::new(2), |_: &[f64]| {
            Ok(CircuitOutput::DensityMatrix(DensityMatrix::maximally_mixed(2)?))
        });
        assert!(matches!(qnode.execute(&[]), Ok(CircuitOutput::DensityMatrix(_))));
    }

    #[test]
    fn test_relative_entropy_of_identical_states() {
        let qnode = ry_cnot();
        let rel = relative_entropy(
            &qnode,
            &qnode,
            &Wires::from([0]),
            &Wires::from([1]),
            &TransformOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(rel.evaluate(&[0.7], &[0.7]).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relative_entropy_support_mismatch_is_infinite() {
        let qnode = ry_cnot();
        let rel = relative_entropy(
            &qnode,
            &qnode,
            &Wires::from([0]),
            &Wires::from([1]),
            &TransformOptions::default(),
        )
        .unwrap();
        let value = rel.evaluate(&[std::f64::consts::PI], &[0.0]).unwrap();
        assert!(value.is_infinite() && value > 0.0);
    }

    #[test]
    fn test_relative_entropy_across_rotated_bases() {
        // D(ρ ‖ I/2) = ln 2 - S(ρ) for any eigenbasis of ρ
        let mixed = QNode::new(Device::new(1), |_: &[f64]| {
            Ok(CircuitOutput::DensityMatrix(DensityMatrix::maximally_mixed(1)?))
        });
        let tilted = QNode::new(Device::new(1), |params: &[f64]| {
            let (c, s) = (params[0].cos(), params[0].sin());
            let p = 0.8;
            // p|ψ⟩⟨ψ| + (1-p)|ψ⊥⟩⟨ψ⊥| with |ψ⟩ = (c, s)
            let a = Complex64::new(p * c * c + (1.0 - p) * s * s, 0.0);
            let b = Complex64::new((2.0 * p - 1.0) * c * s, 0.0);
            let d = Complex64::new(p * s * s + (1.0 - p) * c * c, 0.0);
            Ok(CircuitOutput::DensityMatrix(DensityMatrix::from_matrix(vec![a, b, b, d])?))
        });

        let rel = relative_entropy(
            &tilted,
            &mixed,
            &Wires::from([0]),
            &Wires::from([0]),
            &TransformOptions::default(),
        )
        .unwrap();
        let expected = std::f64::consts::LN_2 + 0.8f64 * 0.8f64.ln() + 0.2f64 * 0.2f64.ln();
        assert_relative_eq!(rel.evaluate(&[0.4], &[]).unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_mutual_info_of_product_state_is_zero() {
        let qnode = QNode::new(Device::new(2), |params: &[f64]| {
            let mut state = StateVector::new(2)?;
            state.apply_single_qubit_gate(&rotation_y(params[0]), 0)?;
            state.apply_single_qubit_gate(&PAULI_X, 1)?;
            Ok(CircuitOutput::StateVector(state))
        });
        let mi = mutual_info(
            &qnode,
            &Wires::from([0]),
            &Wires::from([1]),
            &TransformOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(mi.evaluate(&[1.3]).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_mutual_info_rejects_overlap() {
        let qnode = ry_cnot();
        let err = mutual_info(
            &qnode,
            &Wires::from([0]),
            &Wires::from([0]),
            &TransformOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QinfoError::DuplicateWire { .. }));
    }
}
