//! adastump CLI
//!
//! Generates synthetic datasets, exports them as CSV, and reveals the
//! Gini-optimal decision stump with its AdaBoost say.

use adastump_trainer::{
    report, AppConfig, Dataset, DatasetGenerator, EntropySource, LcgRng, Session, StumpTrainer,
    TrainedStump, UniformSource,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "adastump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Synthetic datasets and Gini-optimal decision stumps for AdaBoost", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset, print it, and reveal its stump
    Demo {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a dataset and export it as CSV
    Generate {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit a stump on an exported CSV dataset
    Fit {
        /// Input CSV path (id,f1,f2[,f3],y)
        #[arg(short, long)]
        input: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
struct GenerationArgs {
    /// Number of points
    #[arg(short, long)]
    rows: Option<usize>,

    /// Feature count (2 or 3); random per dataset when omitted
    #[arg(short, long)]
    features: Option<usize>,

    /// Seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,
}

impl GenerationArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(rows) = self.rows {
            config.session.rows = rows;
        }
        if let Some(features) = self.features {
            config.session.feature_count = Some(features);
        }
        if let Some(seed) = self.seed {
            config.session.seed = Some(seed);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.apply_env();

    match &cli.command {
        Command::Demo { generation, .. } | Command::Generate { generation, .. } => {
            generation.apply(&mut config)
        }
        Command::Fit { .. } => {}
    }
    config.validate().context("Invalid configuration")?;

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        config
            .logging
            .level
            .parse::<Level>()
            .with_context(|| format!("Invalid log level '{}'", config.logging.level))?
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("adastump v{}", adastump_trainer::VERSION);
    if let Some(path) = &cli.config {
        info!("Using configuration from: {}", path.display());
    }

    match cli.command {
        Command::Demo { json, .. } => run_demo(&config, json),
        Command::Generate { output, .. } => run_generate(&config, output),
        Command::Fit { input, json } => run_fit(&input, json),
    }
}

fn build_session(config: &AppConfig) -> Result<Session<Box<dyn UniformSource>>> {
    let rng: Box<dyn UniformSource> = match config.session.seed {
        Some(seed) => {
            info!("Using seeded generator (seed {})", seed);
            Box::new(LcgRng::new(seed))
        }
        None => Box::new(EntropySource::new()),
    };

    let session = Session::new(DatasetGenerator::new(config.generator.clone()), rng)
        .configure(&config.session)?;
    Ok(session)
}

fn log_feature_stats(dataset: &Dataset) {
    if let Some(stats) = dataset.feature_stats() {
        debug!("Feature statistics:");
        for (feature, min, max) in stats {
            debug!("  {}: min={:.3}, max={:.3}", feature, min, max);
        }
    }
}

fn print_result(dataset: &Dataset, trained: &TrainedStump, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "summary": dataset.summary(),
            "stump": trained,
        });
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize result")?;
        println!("{}", text);
    } else {
        println!("{}", report::describe(trained));
    }
    Ok(())
}

fn run_demo(config: &AppConfig, json: bool) -> Result<()> {
    let mut session = build_session(config)?;

    let dataset = session.regenerate().context("Failed to generate dataset")?;
    log_feature_stats(dataset);
    if !json {
        print!("{}", report::render_table(dataset));
        println!();
    }

    let trained = session
        .reveal()
        .context("Failed to train stump")?
        .cloned()
        .context("No dataset to reveal")?;

    let dataset = session.dataset().context("No dataset to reveal")?;
    print_result(dataset, &trained, json)
}

fn run_generate(config: &AppConfig, output: Option<PathBuf>) -> Result<()> {
    let mut session = build_session(config)?;
    let dataset = session.regenerate().context("Failed to generate dataset")?;
    log_feature_stats(dataset);

    let output_dir = output.unwrap_or_else(|| config.export.output_dir.clone());
    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let path = output_dir.join(dataset.suggested_filename(&chrono::Local::now()));
    dataset.write_csv(&path).context("Failed to write CSV")?;

    let summary = dataset.summary();
    info!("Saved dataset to: {}", path.display());
    println!("{}", path.display());
    println!("{}", report::summary_line(&summary));
    Ok(())
}

fn run_fit(input: &Path, json: bool) -> Result<()> {
    info!("Loading dataset from: {}", input.display());
    let dataset = Dataset::from_csv(input).context("Failed to load dataset")?;

    info!(
        "Loaded {} samples with {} features",
        dataset.len(),
        dataset.feature_count()
    );
    log_feature_stats(&dataset);

    let trained = StumpTrainer::new()
        .train(&dataset)
        .context("Failed to train stump")?;
    print_result(&dataset, &trained, json)
}
