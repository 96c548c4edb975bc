use thiserror::Error;

/// Errors returned by the dataset generator, the stump trainer and their I/O helpers.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// Training was requested on a dataset with no points.
    #[error("cannot train a stump on an empty dataset")]
    EmptyDataset,

    #[error("row count must be at least 1, got {0}")]
    InvalidRowCount(usize),

    #[error("feature count must be 2 or 3, got {0}")]
    InvalidFeatureCount(usize),

    /// A point disagrees with the dataset-level feature count.
    #[error("point {id} does not match the dataset feature count {expected}")]
    InconsistentFeatures { id: usize, expected: usize },

    #[error("point ids must run 1..=n in order: expected {expected}, found {found}")]
    InvalidIds { expected: usize, found: usize },

    #[error("csv error on line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type for trainer operations
pub type Result<T> = std::result::Result<T, TrainerError>;
