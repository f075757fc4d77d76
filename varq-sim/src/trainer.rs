//! Mini-batch training loop
//!
//! `Initialized → Training → Finished`. Each [`Trainer::step`] draws a batch
//! with replacement from the training split, takes one optimizer step on the
//! batch square loss, then scores the full splits.

use crate::circuit::{CircuitEvaluator, VariationalCircuit};
use crate::config::TrainerConfig;
use crate::dataset::Dataset;
use crate::encoding::{encode, EncodingAngles, FeatureVector};
use crate::error::{Result, SimError};
use crate::gradient::{ClassifierObjective, GradientConfig};
use crate::loss::{accuracy, sign, square_loss};
use crate::optimizer::Optimizer;
use crate::weights::WeightTensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of a [`Trainer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrainerState {
    Initialized,
    Training,
    Finished,
}

/// Metrics after one optimizer step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationReport {
    /// 0-based step index
    pub iteration: usize,
    /// Square loss over the whole dataset
    pub cost: f64,
    pub train_accuracy: f64,
    pub validation_accuracy: f64,
}

impl fmt::Display for IterationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Iter: {:5} | Cost: {:0.7} | Acc train: {:0.7} | Acc validation: {:0.7}",
            self.iteration, self.cost, self.train_accuracy, self.validation_accuracy
        )
    }
}

/// Outcome of [`Trainer::run`]
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub reports: Vec<IterationReport>,
    pub weights: WeightTensor,
    pub best_validation_accuracy: f64,
    pub final_cost: Option<f64>,
}

struct Split {
    angles: Vec<EncodingAngles>,
    labels: Vec<f64>,
}

impl Split {
    fn encode(dataset: &Dataset) -> Result<Self> {
        Ok(Self {
            angles: dataset.encoded()?,
            labels: dataset.labels(),
        })
    }
}

/// Variational classifier trainer
pub struct Trainer {
    config: TrainerConfig,
    gradient_config: GradientConfig,
    evaluator: Box<dyn CircuitEvaluator>,
    optimizer: Box<dyn Optimizer>,
    train: Split,
    validation: Split,
    params: Vec<f64>,
    rng: StdRng,
    state: TrainerState,
    iteration: usize,
    reports: Vec<IterationReport>,
}

impl Trainer {
    /// Split `dataset`, initialise weights and build the layered circuit
    pub fn new(dataset: &Dataset, config: TrainerConfig) -> Result<Self> {
        let circuit = VariationalCircuit::new(config.layers, config.qubits)?;
        Self::with_evaluator(dataset, config, Box::new(circuit))
    }

    /// Like [`Trainer::new`] with a caller-supplied circuit
    ///
    /// `evaluator.num_weights()` must equal `layers · qubits · 3`.
    pub fn with_evaluator(
        dataset: &Dataset,
        config: TrainerConfig,
        evaluator: Box<dyn CircuitEvaluator>,
    ) -> Result<Self> {
        config.validate()?;

        let expected = config.layers * config.qubits * 3;
        if evaluator.num_weights() != expected {
            return Err(SimError::ShapeMismatch {
                context: "evaluator weights",
                expected,
                actual: evaluator.num_weights(),
            });
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (train, validation) = dataset.split(config.train_fraction, &mut rng)?;
        let train = Split::encode(&train)?;
        let validation = Split::encode(&validation)?;

        let params =
            WeightTensor::random(config.layers, config.qubits, config.init_scale, &mut rng)?
                .flatten();

        Ok(Self {
            gradient_config: config.gradient_config(),
            optimizer: config.optimizer.build(config.learning_rate),
            config,
            evaluator,
            train,
            validation,
            params,
            rng,
            state: TrainerState::Initialized,
            iteration: 0,
            reports: Vec::new(),
        })
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    /// Completed steps
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn reports(&self) -> &[IterationReport] {
        &self.reports
    }

    pub fn train_len(&self) -> usize {
        self.train.labels.len()
    }

    pub fn validation_len(&self) -> usize {
        self.validation.labels.len()
    }

    /// Current flat `[weights.., bias]`
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    pub fn weights(&self) -> Result<WeightTensor> {
        WeightTensor::from_flat(self.config.layers, self.config.qubits, &self.params)
    }

    /// Raw classifier output `circuit(angles) + bias`
    pub fn predict(&self, angles: &EncodingAngles) -> Result<f64> {
        let (weights, bias) = self.params.split_at(self.params.len() - 1);
        Ok(self.evaluator.evaluate(angles, weights)? + bias[0])
    }

    /// Encode `features` and return the raw classifier output
    pub fn predict_features(&self, features: &FeatureVector) -> Result<f64> {
        self.predict(&encode(features)?)
    }

    fn outputs(&self, angles: &[EncodingAngles]) -> Result<Vec<f64>> {
        angles.iter().map(|a| self.predict(a)).collect()
    }

    /// Run one optimizer step and score it
    ///
    /// # Errors
    /// `AlreadyFinished` once the configured iteration count is reached.
    pub fn step(&mut self) -> Result<IterationReport> {
        if self.iteration >= self.config.iterations {
            self.state = TrainerState::Finished;
            return Err(SimError::AlreadyFinished {
                iterations: self.iteration,
            });
        }
        if self.state == TrainerState::Initialized {
            info!(
                train = self.train_len(),
                validation = self.validation_len(),
                params = self.params.len(),
                iterations = self.config.iterations,
                optimizer = %self.config.optimizer,
                "starting training"
            );
            self.state = TrainerState::Training;
        }

        let train_len = self.train.labels.len();
        let (batch_angles, batch_labels): (Vec<EncodingAngles>, Vec<f64>) = (0..self
            .config
            .batch_size)
            .map(|_| {
                let i = self.rng.gen_range(0..train_len);
                (self.train.angles[i], self.train.labels[i])
            })
            .unzip();

        let objective = ClassifierObjective::new(
            self.evaluator.as_ref(),
            &batch_angles,
            &batch_labels,
            &self.gradient_config,
        )?;
        self.params = self.optimizer.step(&objective, &self.params)?;

        let train_out = self.outputs(&self.train.angles)?;
        let validation_out = self.outputs(&self.validation.angles)?;

        let train_pred: Vec<f64> = train_out.iter().map(|&o| sign(o)).collect();
        let validation_pred: Vec<f64> = validation_out.iter().map(|&o| sign(o)).collect();

        let all_labels: Vec<f64> = self
            .train
            .labels
            .iter()
            .chain(&self.validation.labels)
            .copied()
            .collect();
        let all_out: Vec<f64> = train_out.into_iter().chain(validation_out).collect();

        let report = IterationReport {
            iteration: self.iteration,
            cost: square_loss(&all_labels, &all_out)?,
            train_accuracy: accuracy(&self.train.labels, &train_pred)?,
            validation_accuracy: accuracy(&self.validation.labels, &validation_pred)?,
        };

        if !report.cost.is_finite() {
            warn!(iteration = report.iteration, cost = report.cost, "non-finite cost");
        }
        debug!(
            iteration = report.iteration,
            cost = report.cost,
            train_accuracy = report.train_accuracy,
            validation_accuracy = report.validation_accuracy,
            "iteration complete"
        );

        self.iteration += 1;
        if self.iteration == self.config.iterations {
            self.state = TrainerState::Finished;
        }
        self.reports.push(report.clone());
        Ok(report)
    }

    /// Step until finished, handing each report to `callback`
    pub fn run<F>(&mut self, mut callback: F) -> Result<TrainingSummary>
    where
        F: FnMut(&IterationReport),
    {
        let start = Instant::now();
        while self.iteration < self.config.iterations {
            let report = self.step()?;
            callback(&report);
        }
        self.state = TrainerState::Finished;

        let summary = self.summary()?;
        info!(
            iterations = self.iteration,
            final_cost = ?summary.final_cost,
            best_validation_accuracy = summary.best_validation_accuracy,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "training finished"
        );
        Ok(summary)
    }

    pub fn summary(&self) -> Result<TrainingSummary> {
        let best_validation_accuracy = self
            .reports
            .iter()
            .map(|r| r.validation_accuracy)
            .fold(0.0, f64::max);
        Ok(TrainingSummary {
            reports: self.reports.clone(),
            weights: self.weights()?,
            best_validation_accuracy,
            final_cost: self.reports.last().map(|r| r.cost),
        })
    }
}

impl fmt::Debug for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trainer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("iteration", &self.iteration)
            .field("train", &self.train_len())
            .field("validation", &self.validation_len())
            .finish()
    }
}
