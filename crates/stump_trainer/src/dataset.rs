//! Labeled point datasets
//!
//! A dataset is an ordered list of points that all share one feature count
//! (2 or 3). Row order is generation order and is preserved by the CSV
//! export and import.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::{Result, TrainerError};

/// Binary class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Zero,
    One,
}

impl Label {
    pub fn from_bool(positive: bool) -> Self {
        if positive {
            Label::One
        } else {
            Label::Zero
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Label::Zero => 0,
            Label::One => 1,
        }
    }

    pub fn index(self) -> usize {
        self.as_u8() as usize
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Zero),
            1 => Ok(Label::One),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Named numeric attribute of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    F1,
    F2,
    F3,
}

impl Feature {
    /// All features in search order.
    pub const ALL: [Feature; 3] = [Feature::F1, Feature::F2, Feature::F3];

    pub fn name(self) -> &'static str {
        match self {
            Feature::F1 => "f1",
            Feature::F2 => "f2",
            Feature::F3 => "f3",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Feature::F1 => 0,
            Feature::F2 => 1,
            Feature::F3 => 2,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of features carried by every point of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "usize", try_from = "usize")]
pub enum FeatureCount {
    Two,
    Three,
}

impl FeatureCount {
    pub fn get(self) -> usize {
        match self {
            FeatureCount::Two => 2,
            FeatureCount::Three => 3,
        }
    }

    pub fn has_f3(self) -> bool {
        self == FeatureCount::Three
    }

    /// Features present on every point, in column order.
    pub fn features(self) -> &'static [Feature] {
        match self {
            FeatureCount::Two => &Feature::ALL[..2],
            FeatureCount::Three => &Feature::ALL,
        }
    }
}

impl From<FeatureCount> for usize {
    fn from(count: FeatureCount) -> usize {
        count.get()
    }
}

impl TryFrom<usize> for FeatureCount {
    type Error = TrainerError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            2 => Ok(FeatureCount::Two),
            3 => Ok(FeatureCount::Three),
            other => Err(TrainerError::InvalidFeatureCount(other)),
        }
    }
}

impl fmt::Display for FeatureCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// One labeled sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: usize,
    pub f1: f64,
    pub f2: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub f3: Option<f64>,
    pub y: Label,
}

impl Point {
    pub fn value(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::F1 => Some(self.f1),
            Feature::F2 => Some(self.f2),
            Feature::F3 => self.f3,
        }
    }
}

/// Row count, feature count and class balance, for tabular display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub feature_count: usize,
    /// Points per label, indexed by [`Label::index`].
    pub class_counts: [usize; 2],
}

/// Ordered labeled points sharing one feature count
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    points: Vec<Point>,
    feature_count: FeatureCount,
}

impl Dataset {
    /// Build a dataset, checking that ids run `1..=n` and that f3 is present
    /// exactly when `feature_count` is three.
    pub fn new(points: Vec<Point>, feature_count: FeatureCount) -> Result<Self> {
        for (idx, point) in points.iter().enumerate() {
            if point.id != idx + 1 {
                return Err(TrainerError::InvalidIds {
                    expected: idx + 1,
                    found: point.id,
                });
            }
            if point.f3.is_some() != feature_count.has_f3() {
                return Err(TrainerError::InconsistentFeatures {
                    id: point.id,
                    expected: feature_count.get(),
                });
            }
        }

        Ok(Self {
            points,
            feature_count,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn feature_count(&self) -> FeatureCount {
        self.feature_count
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points per label, indexed by [`Label::index`].
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for point in &self.points {
            counts[point.y.index()] += 1;
        }
        counts
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            rows: self.len(),
            feature_count: self.feature_count.get(),
            class_counts: self.class_counts(),
        }
    }

    /// Min and max of every feature column; `None` for an empty dataset.
    pub fn feature_stats(&self) -> Option<Vec<(Feature, f64, f64)>> {
        if self.points.is_empty() {
            return None;
        }

        let stats = self
            .feature_count
            .features()
            .iter()
            .map(|&feature| {
                let (min, max) = self
                    .points
                    .iter()
                    .filter_map(|p| p.value(feature))
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                (feature, min, max)
            })
            .collect();

        Some(stats)
    }

    /// CSV header line for this dataset's columns.
    pub fn csv_header(&self) -> String {
        let mut columns = vec!["id"];
        columns.extend(self.feature_count.features().iter().map(|f| f.name()));
        columns.push("y");
        columns.join(",")
    }

    /// Serialize as delimited text: header, then one line per point with
    /// features fixed to three decimals.
    pub fn to_csv(&self) -> String {
        let mut out = self.csv_header();
        out.push('\n');

        for point in &self.points {
            out.push_str(&point.id.to_string());
            for &feature in self.feature_count.features() {
                // Presence is guaranteed by `Dataset::new`.
                let value = point.value(feature).unwrap_or(f64::NAN);
                out.push_str(&format!(",{:.3}", value));
            }
            out.push_str(&format!(",{}\n", point.y));
        }

        out
    }

    /// Write the CSV export to `path`
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_csv())?;
        Ok(())
    }

    /// Export filename encoding row count, feature count and timestamp.
    pub fn suggested_filename<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!(
            "adaboost_dataset_{}rows_{}f_{}.csv",
            self.len(),
            self.feature_count.get(),
            at.format("%Y%m%d-%H%M%S")
        )
    }

    /// Load dataset from CSV file
    /// Expected format: `id,f1,f2[,f3],y` header followed by one row per point
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_csv(&content)
    }

    /// Parse the CSV export format.
    pub fn parse_csv(content: &str) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_line, header) = lines.next().ok_or(TrainerError::Csv {
            line: 0,
            message: "missing header".to_string(),
        })?;
        let columns: Vec<&str> = header.split(',').map(|s| s.trim()).collect();
        let feature_count = match columns.as_slice() {
            ["id", "f1", "f2", "y"] => FeatureCount::Two,
            ["id", "f1", "f2", "f3", "y"] => FeatureCount::Three,
            _ => {
                return Err(TrainerError::Csv {
                    line: header_line,
                    message: format!("unexpected header '{}'", header),
                })
            }
        };

        let mut points = Vec::new();
        for (line_no, line) in lines {
            let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
            if parts.len() != columns.len() {
                return Err(TrainerError::Csv {
                    line: line_no,
                    message: format!("expected {} columns, got {}", columns.len(), parts.len()),
                });
            }

            let id = parts[0].parse::<usize>().map_err(|e| TrainerError::Csv {
                line: line_no,
                message: format!("invalid id '{}': {}", parts[0], e),
            })?;

            let mut values = [None; 3];
            for (slot, raw) in values.iter_mut().zip(&parts[1..parts.len() - 1]) {
                *slot = Some(parse_feature(raw, line_no)?);
            }

            let raw_label = parts[parts.len() - 1];
            let y = raw_label
                .parse::<u8>()
                .map_err(|e| e.to_string())
                .and_then(Label::try_from)
                .map_err(|message| TrainerError::Csv {
                    line: line_no,
                    message: format!("invalid label '{}': {}", raw_label, message),
                })?;

            points.push(Point {
                id,
                f1: values[0].unwrap_or_default(),
                f2: values[1].unwrap_or_default(),
                f3: values[2],
                y,
            });
        }

        if points.is_empty() {
            return Err(TrainerError::Csv {
                line: header_line,
                message: "dataset is empty".to_string(),
            });
        }

        Self::new(points, feature_count)
    }
}

fn parse_feature(raw: &str, line: usize) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(TrainerError::Csv {
            line,
            message: format!("feature value '{}' is not finite", raw),
        }),
        Err(e) => Err(TrainerError::Csv {
            line,
            message: format!("invalid feature value '{}': {}", raw, e),
        }),
    }
}
