//! Synthetic two-cluster dataset generation
//!
//! Points come from two circular Gaussian clusters (sampled with the
//! Box–Muller transform) and are labeled by a noisy linear boundary. The
//! optional third feature is a noisy linear mix of the first two and never
//! influences the label.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::dataset::{Dataset, FeatureCount, Label, Point};
use crate::errors::{Result, TrainerError};
use crate::random::UniformSource;

/// Smallest `u1` fed to the Box–Muller logarithm.
const MIN_U1: f64 = 1e-12;

/// Generator parameters. The defaults are the reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Centre of cluster A
    pub center_a: [f64; 2],
    /// Centre of cluster B
    pub center_b: [f64; 2],
    /// Dispersion shared by both clusters
    pub sigma: f64,
    /// Weights of the labeling boundary on (x1, x2)
    pub label_weights: [f64; 2],
    pub label_bias: f64,
    /// Width of the uniform noise added to the label score
    pub label_noise: f64,
    /// Weights of x3 on (x1, x2)
    pub aux_weights: [f64; 2],
    /// Width of the uniform noise added to x3
    pub aux_noise: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            center_a: [-1.0, -0.5],
            center_b: [1.2, 0.7],
            sigma: 0.8,
            label_weights: [0.9, -0.7],
            label_bias: 0.1,
            label_noise: 0.2,
            aux_weights: [0.4, -0.2],
            aux_noise: 0.5,
        }
    }
}

/// Draws labeled points from a [`UniformSource`].
#[derive(Debug, Clone, Default)]
pub struct DatasetGenerator {
    config: GeneratorConfig,
}

impl DatasetGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `n` points, all carrying `feature_count` features.
    ///
    /// Each point consumes, in order: the cluster coin, `u1` and `u2` for
    /// Box–Muller, the x3 noise (three features only) and the label noise.
    pub fn generate<R: UniformSource + ?Sized>(
        &self,
        n: usize,
        feature_count: FeatureCount,
        rng: &mut R,
    ) -> Result<Dataset> {
        if n == 0 {
            return Err(TrainerError::InvalidRowCount(n));
        }

        let points: Vec<Point> = (0..n)
            .map(|idx| self.sample_point(idx + 1, feature_count, rng))
            .collect();

        let dataset = Dataset::new(points, feature_count)?;
        let [zeros, ones] = dataset.class_counts();
        debug!(
            "Generated {} points with {} features ({} zeros, {} ones)",
            n, feature_count, zeros, ones
        );

        Ok(dataset)
    }

    fn sample_point<R: UniformSource + ?Sized>(
        &self,
        id: usize,
        feature_count: FeatureCount,
        rng: &mut R,
    ) -> Point {
        let cfg = &self.config;

        let [cx, cy] = if rng.next_unit() < 0.5 {
            cfg.center_a
        } else {
            cfg.center_b
        };

        let u1 = rng.next_unit().max(MIN_U1);
        let u2 = rng.next_unit();
        let radius = (-2.0 * u1.ln()).sqrt() * cfg.sigma;
        let theta = 2.0 * PI * u2;
        let x1 = cx + radius * theta.cos();
        let x2 = cy + radius * theta.sin();

        let x3 = if feature_count.has_f3() {
            let noise = (rng.next_unit() - 0.5) * cfg.aux_noise;
            Some(cfg.aux_weights[0] * x1 + cfg.aux_weights[1] * x2 + noise)
        } else {
            None
        };

        let noise = (rng.next_unit() - 0.5) * cfg.label_noise;
        let score = cfg.label_weights[0] * x1 + cfg.label_weights[1] * x2 + cfg.label_bias + noise;

        Point {
            id,
            f1: x1,
            f2: x2,
            f3: x3,
            y: Label::from_bool(score > 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deterministic::{FixedSequence, LcgRng};
    use crate::random::EntropySource;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_generate_shape_two_features() {
        let generator = DatasetGenerator::default();
        let mut rng = LcgRng::new(3);
        let dataset = generator.generate(15, FeatureCount::Two, &mut rng).unwrap();

        assert_eq!(dataset.len(), 15);
        for (idx, point) in dataset.points().iter().enumerate() {
            assert_eq!(point.id, idx + 1);
            assert!(point.f3.is_none());
        }
    }

    #[test]
    fn test_generate_shape_three_features() {
        let generator = DatasetGenerator::default();
        let mut rng = EntropySource::new();
        let dataset = generator.generate(20, FeatureCount::Three, &mut rng).unwrap();

        assert_eq!(dataset.len(), 20);
        assert!(dataset.points().iter().all(|p| p.f3.is_some()));
    }

    #[test]
    fn test_zero_rows_rejected() {
        let generator = DatasetGenerator::default();
        let mut rng = LcgRng::new(1);
        assert!(matches!(
            generator.generate(0, FeatureCount::Two, &mut rng),
            Err(TrainerError::InvalidRowCount(0))
        ));
    }

    #[test]
    fn test_point_at_cluster_centres() {
        // u1 = 1 - eps puts the radius at ~0, so points sit on the centres.
        let one = 1.0 - f64::EPSILON;
        let generator = DatasetGenerator::default();
        let mut rng = FixedSequence::new(vec![
            0.1, one, 0.0, 0.5, // cluster A, mid label noise
            0.9, one, 0.0, 0.5, // cluster B
        ]);
        let dataset = generator.generate(2, FeatureCount::Two, &mut rng).unwrap();
        let points = dataset.points();

        assert!((points[0].f1 + 1.0).abs() < 1e-6);
        assert!((points[0].f2 + 0.5).abs() < 1e-6);
        assert_eq!(points[0].y, Label::Zero);

        assert!((points[1].f1 - 1.2).abs() < 1e-6);
        assert!((points[1].f2 - 0.7).abs() < 1e-6);
        assert_eq!(points[1].y, Label::One);
        assert_eq!(rng.consumed(), 8);
    }

    #[test]
    fn test_box_muller_geometry() {
        // u1 = e^-2 gives R = 2σ; u2 = 0.25 points straight up.
        let u1 = (-2.0f64).exp();
        let generator = DatasetGenerator::default();
        let mut rng = FixedSequence::new(vec![0.0, u1, 0.25, 0.5, 0.5]);
        let dataset = generator.generate(1, FeatureCount::Three, &mut rng).unwrap();
        let p = dataset.points()[0];

        let radius = 2.0 * 0.8;
        assert!((p.f1 + 1.0).abs() < 1e-9);
        assert!(approx(p.f2, -0.5 + radius));
        assert!(approx(p.f3.unwrap(), 0.4 * p.f1 - 0.2 * p.f2));
        // score = -0.9 - 0.7 * 1.1 + 0.1 < 0
        assert_eq!(p.y, Label::Zero);
        assert_eq!(rng.consumed(), 5);
    }

    #[test]
    fn test_u1_zero_is_floored() {
        let generator = DatasetGenerator::default();
        let mut rng = FixedSequence::new(vec![0.0, 0.0, 0.0, 0.5]);
        let dataset = generator.generate(1, FeatureCount::Two, &mut rng).unwrap();
        let p = dataset.points()[0];
        assert!(p.f1.is_finite());
        assert!(p.f2.is_finite());
    }

    #[test]
    fn test_label_ignores_third_feature() {
        let generator = DatasetGenerator::default();
        let base = [0.7, 0.3, 0.6];

        let mut low = FixedSequence::new(vec![base[0], base[1], base[2], 0.0, 0.5]);
        let mut high = FixedSequence::new(vec![base[0], base[1], base[2], 0.99, 0.5]);
        let a = generator.generate(1, FeatureCount::Three, &mut low).unwrap();
        let b = generator.generate(1, FeatureCount::Three, &mut high).unwrap();

        assert_ne!(a.points()[0].f3, b.points()[0].f3);
        assert_eq!(a.points()[0].y, b.points()[0].y);
    }

    #[test]
    fn test_custom_config_is_used() {
        let config = GeneratorConfig {
            center_a: [10.0, 10.0],
            center_b: [10.0, 10.0],
            ..GeneratorConfig::default()
        };
        let generator = DatasetGenerator::new(config);
        let mut rng = LcgRng::new(9);
        let dataset = generator.generate(30, FeatureCount::Two, &mut rng).unwrap();
        let mean_f1: f64 = dataset.points().iter().map(|p| p.f1).sum::<f64>() / 30.0;
        assert!(mean_f1 > 8.0);
    }
}
