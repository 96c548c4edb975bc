//! adastump - decision stumps for AdaBoost teaching
//!
//! Generates small synthetic two-cluster datasets, fits the Gini-optimal
//! one-split decision stump, and computes the AdaBoost "say" of that stump.

pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod generator;
pub mod random;
pub mod report;
pub mod session;
pub mod stump;
pub mod trainer;

pub use config::AppConfig;
pub use dataset::{Dataset, DatasetSummary, Feature, FeatureCount, Label, Point};
pub use deterministic::{FixedSequence, LcgRng, SplitTieBreaker};
pub use errors::TrainerError;
pub use generator::{DatasetGenerator, GeneratorConfig};
pub use random::{EntropySource, UniformSource};
pub use session::Session;
pub use stump::{fit, gini, Sample, Split, StumpDescriptor};
pub use trainer::{format_say, say, StumpTrainer, TrainedStump};

/// Generate a dataset from the given source and reveal its stump in one step.
pub fn generate_and_train<R: UniformSource + ?Sized>(
    rows: usize,
    feature_count: FeatureCount,
    rng: &mut R,
) -> Result<(Dataset, TrainedStump), TrainerError> {
    let dataset = DatasetGenerator::default().generate(rows, feature_count, rng)?;
    let trained = StumpTrainer::new().train(&dataset)?;
    Ok((dataset, trained))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
