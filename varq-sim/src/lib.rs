//! Variational quantum classifier
//!
//! Four real features are amplitude-encoded into two qubits, passed through
//! layers of `Rot` + `CNOT`, and read out as `⟨Z⟩` on qubit 0 plus a bias.
//! Training minimizes the batch square loss against ±1 labels.
//!
//! # Example
//!
//! ```no_run
//! use varq_sim::{Dataset, Trainer, TrainerConfig};
//!
//! let dataset = Dataset::load_from_file("data/sample_classes.txt")?;
//! let config = TrainerConfig::default().with_iterations(60).with_seed(0);
//!
//! let mut trainer = Trainer::new(&dataset, config)?;
//! let summary = trainer.run(|report| println!("{}", report))?;
//! println!("best validation accuracy: {}", summary.best_validation_accuracy);
//! # Ok::<(), varq_sim::SimError>(())
//! ```

pub mod circuit;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod gradient;
pub mod loss;
pub mod optimizer;
pub mod trainer;
pub mod weights;

pub use circuit::{CircuitEvaluator, VariationalCircuit};
pub use config::TrainerConfig;
pub use dataset::{Dataset, Sample};
pub use encoding::{derive_angles, encode, normalize, prepare_state, EncodingAngles, FeatureVector};
pub use error::{Result, SimError};
pub use gradient::{
    circuit_gradient, ClassifierObjective, GradientConfig, GradientMethod, GradientResult,
    Objective,
};
pub use loss::{accuracy, sign, square_loss};
pub use optimizer::{
    AdamConfig, AdamOptimizer, GradientDescentOptimizer, MomentumConfig, MomentumOptimizer,
    Optimizer, OptimizerKind,
};
pub use trainer::{IterationReport, Trainer, TrainerState, TrainingSummary};
pub use weights::WeightTensor;
