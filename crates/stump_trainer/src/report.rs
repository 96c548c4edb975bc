//! Text output for the CLI: the dataset table and the reveal summary.

use crate::dataset::{Dataset, DatasetSummary};
use crate::trainer::{format_say, TrainedStump};

/// One-line dataset summary: rows, features and class balance.
pub fn summary_line(summary: &DatasetSummary) -> String {
    format!(
        "{} rows, {} features, class 0: {}, class 1: {}",
        summary.rows, summary.feature_count, summary.class_counts[0], summary.class_counts[1]
    )
}

/// Render the dataset as an aligned text table followed by its summary line.
pub fn render_table(dataset: &Dataset) -> String {
    let features = dataset.feature_count().features();

    let mut header = vec!["id".to_string()];
    header.extend(features.iter().map(|f| f.name().to_string()));
    header.push("y".to_string());

    let rows: Vec<Vec<String>> = dataset
        .points()
        .iter()
        .map(|point| {
            let mut cells = vec![point.id.to_string()];
            cells.extend(features.iter().map(|&f| match point.value(f) {
                Some(v) => format!("{:.3}", v),
                None => "-".to_string(),
            }));
            cells.push(point.y.to_string());
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = format_row(&header);
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&summary_line(&dataset.summary()));
    out.push('\n');
    out
}

/// Human-readable reveal: say, training error, and the split or the
/// constant prediction.
pub fn describe(trained: &TrainedStump) -> String {
    let stump = &trained.stump;
    let percent = stump.error_rate * 100.0;

    let rule = match stump.split {
        Some(split) => format!(
            "split on {} at {:.3}: predict {} when {} <= {:.3}, else {}",
            split.feature,
            split.threshold,
            stump.left_pred,
            split.feature,
            split.threshold,
            stump.right_pred
        ),
        None => format!(
            "constant prediction {} (no feature offers a valid threshold)",
            stump.left_pred
        ),
    };

    format!(
        "Say (alpha): {} | training error: {:.1}% ({}/{}) | {}",
        format_say(trained.say),
        percent,
        stump.error_count,
        stump.total,
        rule
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Feature, FeatureCount, Label, Point};
    use crate::stump::{Split, StumpDescriptor};

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec![
                Point { id: 1, f1: -1.5, f2: 0.25, f3: None, y: Label::Zero },
                Point { id: 2, f1: 10.0, f2: -0.125, f3: None, y: Label::One },
            ],
            FeatureCount::Two,
        )
        .unwrap()
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&sample_dataset());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "id      f1      f2  y");
        assert_eq!(lines[1], " 1  -1.500   0.250  0");
        assert_eq!(lines[2], " 2  10.000  -0.125  1");
        assert_eq!(lines[3], "2 rows, 2 features, class 0: 1, class 1: 1");
    }

    #[test]
    fn test_describe_split() {
        let trained = TrainedStump {
            stump: StumpDescriptor {
                split: Some(Split { feature: Feature::F2, threshold: 0.4 }),
                left_pred: Label::One,
                right_pred: Label::Zero,
                impurity: Some(0.3),
                error_count: 3,
                total: 15,
                error_rate: 0.2,
            },
            say: 0.693147,
        };
        assert_eq!(
            describe(&trained),
            "Say (alpha): 0.693 | training error: 20.0% (3/15) | \
             split on f2 at 0.400: predict 1 when f2 <= 0.400, else 0"
        );
    }

    #[test]
    fn test_describe_constant() {
        let trained = TrainedStump {
            stump: StumpDescriptor {
                split: None,
                left_pred: Label::One,
                right_pred: Label::One,
                impurity: None,
                error_count: 0,
                total: 4,
                error_rate: 0.0,
            },
            say: f64::INFINITY,
        };
        let text = describe(&trained);
        assert!(text.starts_with("Say (alpha): +∞ | training error: 0.0% (0/4)"));
        assert!(text.contains("constant prediction 1"));
    }
}
