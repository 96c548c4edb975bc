//! Regenerate / reveal session
//!
//! Owns the current dataset between a regeneration and the next one, and the
//! stump revealed for it. Each regeneration replaces the dataset wholesale
//! and clears the previous reveal.

use tracing::{debug, info};

use crate::config::{SessionConfig, DEFAULT_ROWS};
use crate::dataset::{Dataset, FeatureCount};
use crate::errors::{Result, TrainerError};
use crate::generator::DatasetGenerator;
use crate::random::{EntropySource, UniformSource};
use crate::trainer::{StumpTrainer, TrainedStump};

/// Session state driven by the regenerate and reveal actions
pub struct Session<R> {
    generator: DatasetGenerator,
    trainer: StumpTrainer,
    rng: R,
    rows: usize,
    feature_count: Option<FeatureCount>,
    dataset: Option<Dataset>,
    revealed: Option<TrainedStump>,
}

impl Session<EntropySource> {
    /// Session drawing from OS entropy with the default generator.
    pub fn with_entropy() -> Self {
        Self::new(DatasetGenerator::default(), EntropySource::new())
    }
}

impl<R: UniformSource> Session<R> {
    pub fn new(generator: DatasetGenerator, rng: R) -> Self {
        Self {
            generator,
            trainer: StumpTrainer::new(),
            rng,
            rows: DEFAULT_ROWS,
            feature_count: None,
            dataset: None,
            revealed: None,
        }
    }

    /// Apply row count and fixed feature count from configuration.
    pub fn configure(mut self, config: &SessionConfig) -> Result<Self> {
        self = self.with_rows(config.rows)?;
        self.feature_count = config.fixed_feature_count()?;
        Ok(self)
    }

    pub fn with_rows(mut self, rows: usize) -> Result<Self> {
        if rows == 0 {
            return Err(TrainerError::InvalidRowCount(rows));
        }
        self.rows = rows;
        Ok(self)
    }

    /// Pin the feature count instead of drawing it per regeneration.
    pub fn with_feature_count(mut self, feature_count: Option<FeatureCount>) -> Self {
        self.feature_count = feature_count;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn revealed(&self) -> Option<&TrainedStump> {
        self.revealed.as_ref()
    }

    /// Generate a fresh dataset, replacing the current one and clearing any
    /// revealed stump.
    pub fn regenerate(&mut self) -> Result<&Dataset> {
        let feature_count = match self.feature_count {
            Some(count) => count,
            None if self.rng.next_unit() < 0.5 => FeatureCount::Two,
            None => FeatureCount::Three,
        };

        let dataset = self
            .generator
            .generate(self.rows, feature_count, &mut self.rng)?;
        let summary = dataset.summary();
        info!(
            "Regenerated dataset: {} rows, {} features, class balance {}/{}",
            summary.rows, summary.feature_count, summary.class_counts[0], summary.class_counts[1]
        );

        self.revealed = None;
        Ok(&*self.dataset.insert(dataset))
    }

    /// Train on the current dataset. A no-op returning `Ok(None)` when no
    /// dataset has been generated yet.
    pub fn reveal(&mut self) -> Result<Option<&TrainedStump>> {
        let Some(dataset) = self.dataset.as_ref() else {
            debug!("Reveal requested before any dataset was generated");
            return Ok(None);
        };

        let trained = self.trainer.train(dataset)?;
        Ok(Some(&*self.revealed.insert(trained)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deterministic::{FixedSequence, LcgRng};

    #[test]
    fn test_reveal_before_regenerate_is_noop() {
        let mut session = Session::new(DatasetGenerator::default(), LcgRng::new(1));
        assert!(session.reveal().unwrap().is_none());
        assert!(session.dataset().is_none());
        assert!(session.revealed().is_none());
    }

    #[test]
    fn test_regenerate_uses_default_rows() {
        let mut session = Session::new(DatasetGenerator::default(), LcgRng::new(5));
        let dataset = session.regenerate().unwrap();
        assert_eq!(dataset.len(), DEFAULT_ROWS);
    }

    #[test]
    fn test_feature_count_drawn_from_source() {
        // First draw picks the feature count, the rest feed the generator.
        let mut low = Session::new(DatasetGenerator::default(), FixedSequence::new(vec![0.2, 0.6]))
            .with_rows(2)
            .unwrap();
        assert_eq!(low.regenerate().unwrap().feature_count(), FeatureCount::Two);

        let mut high = Session::new(DatasetGenerator::default(), FixedSequence::new(vec![0.7, 0.6]))
            .with_rows(2)
            .unwrap();
        assert_eq!(high.regenerate().unwrap().feature_count(), FeatureCount::Three);
    }

    #[test]
    fn test_regenerate_clears_reveal() {
        let mut session = Session::new(DatasetGenerator::default(), LcgRng::new(9))
            .with_rows(12)
            .unwrap();
        session.regenerate().unwrap();
        let trained = session.reveal().unwrap().cloned().unwrap();
        assert_eq!(trained.stump.total, 12);
        assert!(session.revealed().is_some());

        session.regenerate().unwrap();
        assert!(session.revealed().is_none());
    }

    #[test]
    fn test_fixed_feature_count() {
        let mut session = Session::new(DatasetGenerator::default(), LcgRng::new(2))
            .with_feature_count(Some(FeatureCount::Three));
        for _ in 0..5 {
            let dataset = session.regenerate().unwrap();
            assert_eq!(dataset.feature_count(), FeatureCount::Three);
        }
    }

    #[test]
    fn test_configure() {
        let config = SessionConfig {
            rows: 7,
            feature_count: Some(2),
            seed: None,
        };
        let mut session = Session::new(DatasetGenerator::default(), LcgRng::new(4))
            .configure(&config)
            .unwrap();
        assert_eq!(session.rows(), 7);
        let dataset = session.regenerate().unwrap();
        assert_eq!(dataset.feature_count(), FeatureCount::Two);
        assert_eq!(dataset.len(), 7);

        let bad = SessionConfig {
            rows: 0,
            ..SessionConfig::default()
        };
        assert!(Session::new(DatasetGenerator::default(), LcgRng::new(4))
            .configure(&bad)
            .is_err());
    }
}
