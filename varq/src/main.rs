//! varq command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use varq_gates::matrices::ising_xx;
use varq_qinfo::{mutual_info, reference, vn_entropy, CircuitOutput, Device, QNode, TransformOptions, Wires};
use varq_sim::{Dataset, GradientMethod, OptimizerKind, Trainer, TrainerConfig};
use varq_state::StateVector;

#[derive(Parser)]
#[command(name = "varq")]
#[command(about = "Variational quantum classifier and reduced-state entropy tools")]
struct Args {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train the classifier on a whitespace-delimited dataset
    Train(TrainArgs),
    /// Compare transform and closed-form entropies for the IsingXX family
    Entropy(EntropyArgs),
}

#[derive(clap::Args)]
struct TrainArgs {
    /// Dataset: feature columns then a 0/1 label per line
    dataset: PathBuf,

    /// TOML config with a [trainer] table; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    #[arg(long)]
    layers: Option<usize>,

    /// Fix the RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// gd, momentum or adam
    #[arg(long)]
    optimizer: Option<OptimizerKind>,

    /// Use central finite differences instead of parameter shift
    #[arg(long)]
    finite_difference: bool,

    /// Write the per-iteration history and final weights as JSON
    #[arg(long)]
    history_json: Option<PathBuf>,
}

#[derive(clap::Args)]
struct EntropyArgs {
    /// IsingXX angles; defaults to five points on [0, 2π]
    #[arg(long = "theta")]
    thetas: Vec<f64>,

    /// Logarithm base, natural log when omitted
    #[arg(long)]
    base: Option<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    match args.command {
        Command::Train(train) => run_train(train),
        Command::Entropy(entropy) => run_entropy(entropy),
    }
}

fn load_config(args: &TrainArgs) -> Result<TrainerConfig> {
    let mut config = match &args.config {
        Some(path) => TrainerConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TrainerConfig::default(),
    };

    if let Some(iterations) = args.iterations {
        config = config.with_iterations(iterations);
    }
    if let Some(batch_size) = args.batch_size {
        config = config.with_batch_size(batch_size);
    }
    if let Some(learning_rate) = args.learning_rate {
        config = config.with_learning_rate(learning_rate);
    }
    if let Some(layers) = args.layers {
        config = config.with_layers(layers);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(optimizer) = args.optimizer {
        config = config.with_optimizer(optimizer);
    }
    if args.finite_difference {
        config = config.with_gradient_method(GradientMethod::FiniteDifference);
    }

    config.validate()?;
    Ok(config)
}

fn run_train(args: TrainArgs) -> Result<()> {
    let config = load_config(&args)?;
    let dataset = Dataset::load_from_file(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;
    if dataset.num_features() != 4 {
        bail!(
            "the classifier encodes exactly 4 features, {} has {}",
            args.dataset.display(),
            dataset.num_features()
        );
    }

    info!("Training on {} samples from {}", dataset.len(), args.dataset.display());

    let mut trainer = Trainer::new(&dataset, config)?;
    let summary = trainer.run(|report| println!("{}", report))?;

    println!(
        "Best validation accuracy: {:0.7}",
        summary.best_validation_accuracy
    );

    if let Some(path) = &args.history_json {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote training history to {}", path.display());
    }

    Ok(())
}

fn ising_xx_qnode() -> QNode {
    QNode::new(Device::new(2), |params: &[f64]| {
        let mut state = StateVector::new(2)?;
        state.apply_two_qubit_gate(&ising_xx(params[0]), 0, 1)?;
        Ok(CircuitOutput::StateVector(state))
    })
}

fn run_entropy(args: EntropyArgs) -> Result<()> {
    let thetas = if args.thetas.is_empty() {
        (0..5).map(|i| 2.0 * PI * i as f64 / 4.0).collect()
    } else {
        args.thetas
    };

    let mut options = TransformOptions::default();
    if let Some(base) = args.base {
        options = options.with_base(base);
    }
    let base = args.base.unwrap_or(std::f64::consts::E);

    let qnode = ising_xx_qnode();
    let wire0 = Wires::from([0]);
    let wire1 = Wires::from([1]);
    let entropy = vn_entropy(&qnode, &wire0, &options)?;
    let info = mutual_info(&qnode, &wire0, &wire1, &options)?;

    println!(
        "{:>10} | {:>12} {:>12} | {:>12} {:>12} | {:>12} {:>12}",
        "theta", "S", "S ref", "dS", "dS ref", "I", "I ref"
    );
    for theta in thetas {
        let params = [theta];
        let grad = entropy.gradient(&params)?;
        println!(
            "{:>10.6} | {:>12.8} {:>12.8} | {:>12.8} {:>12.8} | {:>12.8} {:>12.8}",
            theta,
            entropy.evaluate(&params)?,
            reference::ising_xx_entropy(theta, base),
            grad[0],
            reference::entropy_gradient(theta) / base.ln(),
            info.evaluate(&params)?,
            reference::ising_xx_mutual_info(theta, base),
        );
    }

    Ok(())
}
