//! Application configuration
//!
//! Layered as: built-in defaults, an optional TOML file, `ADASTUMP_*`
//! environment variables, then command-line flags (applied by the binary).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::dataset::FeatureCount;
use crate::errors::{Result, TrainerError};
use crate::generator::GeneratorConfig;

/// Default number of points per regeneration
pub const DEFAULT_ROWS: usize = 15;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub generator: GeneratorConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Regeneration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Points per dataset
    pub rows: usize,
    /// Fixed feature count (2 or 3); drawn at random per regeneration when unset
    pub feature_count: Option<usize>,
    /// Seed for reproducible runs; OS entropy when unset
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            feature_count: None,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn fixed_feature_count(&self) -> Result<Option<FeatureCount>> {
        self.feature_count.map(FeatureCount::try_from).transpose()
    }
}

/// CSV export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("datasets"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Write configuration as pretty TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Apply `ADASTUMP_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparsable values are
    /// logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ADASTUMP_ROWS") {
            match val.parse() {
                Ok(rows) => self.session.rows = rows,
                Err(_) => warn!("Ignoring invalid ADASTUMP_ROWS={}", val),
            }
        }

        if let Some(val) = lookup("ADASTUMP_FEATURES") {
            match val.parse() {
                Ok(count) => self.session.feature_count = Some(count),
                Err(_) => warn!("Ignoring invalid ADASTUMP_FEATURES={}", val),
            }
        }

        if let Some(val) = lookup("ADASTUMP_SEED") {
            match val.parse() {
                Ok(seed) => self.session.seed = Some(seed),
                Err(_) => warn!("Ignoring invalid ADASTUMP_SEED={}", val),
            }
        }

        if let Some(val) = lookup("ADASTUMP_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("ADASTUMP_LOG") {
            self.logging.level = val;
        }
    }

    /// Reject settings the generator cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.session.rows == 0 {
            return Err(TrainerError::Config("session.rows must be at least 1".to_string()));
        }

        self.session.fixed_feature_count()?;

        if !(self.generator.sigma > 0.0 && self.generator.sigma.is_finite()) {
            return Err(TrainerError::Config(format!(
                "generator.sigma must be positive, got {}",
                self.generator.sigma
            )));
        }

        if self.generator.label_noise < 0.0 || self.generator.aux_noise < 0.0 {
            return Err(TrainerError::Config(
                "generator noise widths must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}
