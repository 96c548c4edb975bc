//! Stump training and the AdaBoost "say"
//!
//! Wraps the stump search with the boosting confidence weight
//! `alpha = 0.5 * ln((1 - err) / err)` that AdaBoost would assign to it.

use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::errors::Result;
use crate::stump::{self, StumpDescriptor};

/// Boosting confidence weight for a classifier with the given error rate.
///
/// A perfect classifier gets `+∞`, an always-wrong one `-∞`.
pub fn say(error_rate: f64) -> f64 {
    if error_rate <= 0.0 {
        f64::INFINITY
    } else if error_rate >= 1.0 {
        f64::NEG_INFINITY
    } else {
        0.5 * ((1.0 - error_rate) / error_rate).ln()
    }
}

/// Three decimals, or a signed infinity symbol.
pub fn format_say(value: f64) -> String {
    if value == f64::INFINITY {
        "+∞".to_string()
    } else if value == f64::NEG_INFINITY {
        "−∞".to_string()
    } else {
        format!("{:.3}", value)
    }
}

/// A fitted stump together with its say.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedStump {
    pub stump: StumpDescriptor,
    /// Serialized through [`format_say`] since JSON has no infinities.
    #[serde(serialize_with = "serialize_say")]
    pub say: f64,
}

fn serialize_say<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&format_say(*value))
    }
}

/// Stump trainer
#[derive(Debug, Clone, Default)]
pub struct StumpTrainer;

impl StumpTrainer {
    pub fn new() -> Self {
        Self
    }

    /// Fit a stump on the dataset and compute its say
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedStump> {
        debug!(
            "Training stump on {} points with {} features",
            dataset.len(),
            dataset.feature_count()
        );

        let stump = stump::fit(dataset.points())?;
        let say = say(stump.error_rate);

        match stump.split {
            Some(split) => info!(
                "Best split: {} <= {:.3} (left={}, right={}), errors {}/{}, say {}",
                split.feature,
                split.threshold,
                stump.left_pred,
                stump.right_pred,
                stump.error_count,
                stump.total,
                format_say(say)
            ),
            None => info!(
                "No valid split, constant prediction {}, errors {}/{}, say {}",
                stump.left_pred,
                stump.error_count,
                stump.total,
                format_say(say)
            ),
        }

        Ok(TrainedStump { stump, say })
    }
}
