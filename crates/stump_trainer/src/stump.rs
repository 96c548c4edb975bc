//! Depth-one decision tree (stump) builder
//!
//! Implements an exact exhaustive threshold search: every feature is sorted
//! once and every boundary between two distinct adjacent values is scored by
//! size-weighted Gini impurity.

use serde::{Deserialize, Serialize};

use crate::dataset::{Feature, Label, Point};
use crate::deterministic::SplitTieBreaker;
use crate::errors::{Result, TrainerError};

/// A labeled sample the stump can be trained on.
pub trait Sample {
    /// Value of `feature`, or `None` when the sample does not carry it.
    fn value(&self, feature: Feature) -> Option<f64>;
    fn label(&self) -> Label;
}

impl Sample for Point {
    fn value(&self, feature: Feature) -> Option<f64> {
        Point::value(self, feature)
    }

    fn label(&self) -> Label {
        self.y
    }
}

/// Gini impurity `1 - (p0² + p1²)` of a group; an empty group is pure.
pub fn gini(count0: usize, count1: usize) -> f64 {
    let total = count0 + count1;
    if total == 0 {
        return 0.0;
    }
    let p0 = count0 as f64 / total as f64;
    let p1 = count1 as f64 / total as f64;
    1.0 - (p0 * p0 + p1 * p1)
}

/// Majority label, ties going to [`Label::One`].
pub fn majority(count0: usize, count1: usize) -> Label {
    Label::from_bool(count1 >= count0)
}

/// Feature and threshold of a stump's single split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub feature: Feature,
    pub threshold: f64,
}

/// Result of training a stump.
///
/// `split` is `None` for the constant-prediction fallback, in which case
/// `left_pred == right_pred`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StumpDescriptor {
    pub split: Option<Split>,
    pub left_pred: Label,
    pub right_pred: Label,
    /// Weighted Gini impurity of the chosen boundary.
    pub impurity: Option<f64>,
    pub error_count: usize,
    pub total: usize,
    pub error_rate: f64,
}

impl StumpDescriptor {
    pub fn feature(&self) -> Option<Feature> {
        self.split.map(|s| s.feature)
    }

    pub fn threshold(&self) -> Option<f64> {
        self.split.map(|s| s.threshold)
    }

    pub fn is_constant(&self) -> bool {
        self.split.is_none()
    }

    /// Apply the stump to one sample.
    ///
    /// Returns `None` when the split feature is missing on `sample`; training
    /// error counts such samples as misclassified.
    pub fn predict<S: Sample + ?Sized>(&self, sample: &S) -> Option<Label> {
        match self.split {
            None => Some(self.left_pred),
            Some(split) => sample.value(split.feature).map(|v| {
                if v <= split.threshold {
                    self.left_pred
                } else {
                    self.right_pred
                }
            }),
        }
    }
}

/// Best boundary found so far
#[derive(Debug, Clone)]
struct SplitCandidate {
    split: Split,
    impurity: f64,
    left_pred: Label,
    right_pred: Label,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn beats(&self, current: &SplitCandidate) -> bool {
        self.impurity < current.impurity
            || (self.impurity == current.impurity && self.tie_breaker < current.tie_breaker)
    }
}

/// Exhaustive stump search over a slice of samples
pub struct StumpBuilder<'a, S> {
    samples: &'a [S],
    features: Vec<Feature>,
}

impl<'a, S: Sample> StumpBuilder<'a, S> {
    /// Active features are f1 and f2, plus f3 when any sample carries it.
    pub fn new(samples: &'a [S]) -> Self {
        let mut features = vec![Feature::F1, Feature::F2];
        if samples.iter().any(|s| s.value(Feature::F3).is_some()) {
            features.push(Feature::F3);
        }

        Self { samples, features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Fit the stump, falling back to a constant prediction when no feature
    /// offers a boundary between two distinct values.
    pub fn build(&self) -> Result<StumpDescriptor> {
        if self.samples.is_empty() {
            return Err(TrainerError::EmptyDataset);
        }

        let descriptor = match self.find_best_split() {
            Some(best) => self.evaluate(
                Some(best.split),
                best.left_pred,
                best.right_pred,
                Some(best.impurity),
            ),
            None => {
                let (count0, count1) = label_counts(self.samples.iter().map(|s| s.label()));
                let constant = majority(count0, count1);
                self.evaluate(None, constant, constant, None)
            }
        };

        Ok(descriptor)
    }

    /// Find the minimum-impurity boundary across all active features
    fn find_best_split(&self) -> Option<SplitCandidate> {
        let mut best_split: Option<SplitCandidate> = None;

        for (feature_idx, &feature) in self.features.iter().enumerate() {
            let mut pairs: Vec<(f64, Label)> = self
                .samples
                .iter()
                .filter_map(|s| s.value(feature).map(|v| (v, s.label())))
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (total0, total1) = label_counts(pairs.iter().map(|&(_, y)| y));
            let (mut left0, mut left1) = (0usize, 0usize);

            for (position, window) in pairs.windows(2).enumerate() {
                let (value, label) = window[0];
                let next_value = window[1].0;
                match label {
                    Label::Zero => left0 += 1,
                    Label::One => left1 += 1,
                }

                if value == next_value {
                    continue;
                }

                let (right0, right1) = (total0 - left0, total1 - left1);
                let n_left = (left0 + left1) as f64;
                let n_right = (right0 + right1) as f64;
                let impurity = (n_left * gini(left0, left1) + n_right * gini(right0, right1))
                    / (n_left + n_right);

                let candidate = SplitCandidate {
                    split: Split {
                        feature,
                        threshold: (value + next_value) / 2.0,
                    },
                    impurity,
                    left_pred: majority(left0, left1),
                    right_pred: majority(right0, right1),
                    tie_breaker: SplitTieBreaker::new(feature_idx, position),
                };

                best_split = match best_split {
                    Some(current) if !candidate.beats(&current) => Some(current),
                    _ => Some(candidate),
                };
            }
        }

        best_split
    }

    /// Re-apply the rule to every sample to count training errors
    fn evaluate(
        &self,
        split: Option<Split>,
        left_pred: Label,
        right_pred: Label,
        impurity: Option<f64>,
    ) -> StumpDescriptor {
        let mut descriptor = StumpDescriptor {
            split,
            left_pred,
            right_pred,
            impurity,
            error_count: 0,
            total: self.samples.len(),
            error_rate: 0.0,
        };

        let error_count = self
            .samples
            .iter()
            .filter(|s| descriptor.predict(*s) != Some(s.label()))
            .count();

        descriptor.error_count = error_count;
        descriptor.error_rate = error_count as f64 / self.samples.len() as f64;
        descriptor
    }
}

fn label_counts<I: IntoIterator<Item = Label>>(labels: I) -> (usize, usize) {
    labels
        .into_iter()
        .fold((0, 0), |(zeros, ones), label| match label {
            Label::Zero => (zeros + 1, ones),
            Label::One => (zeros, ones + 1),
        })
}

/// Fit a stump on `samples`.
pub fn fit<S: Sample>(samples: &[S]) -> Result<StumpDescriptor> {
    StumpBuilder::new(samples).build()
}
