// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chart specifications.
//!
//! A [`ChartSpec`] is the library-independent description of one chart:
//! labels along the x-axis, one or more named series of the same length,
//! and axis titles. Specs are rebuilt on every selection and never stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when assembling a chart spec.
#[derive(Debug, Error, PartialEq)]
pub enum ChartSpecError {
    /// A series does not have one value per label
    #[error("series '{series}' has {values} values for {labels} labels")]
    LengthMismatch {
        /// Offending series
        series: String,
        /// Number of labels
        labels: usize,
        /// Number of values in the series
        values: usize,
    },

    /// Two series share the same name
    #[error("duplicate series '{0}'")]
    DuplicateSeries(String),
}

/// How the series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Connected points, used for parameter sweeps and iteration histories.
    #[default]
    Line,
    /// One bar per label.
    Bar,
}

/// Scale of the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    /// Linear scale
    #[default]
    Linear,
    /// Base-10 logarithmic scale
    Logarithmic,
}

/// A named sequence of values, one per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend entry.
    pub name: String,
    /// Values aligned with the chart labels.
    pub values: Vec<f64>,
}

/// A fixed horizontal line, e.g. the ground truth of an error metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    /// Legend entry.
    pub name: String,
    /// Position on the value axis.
    pub value: f64,
}

/// Description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Chart title.
    pub title: String,
    /// Line or bar chart.
    pub kind: ChartKind,
    /// X-axis labels.
    pub labels: Vec<String>,
    /// Series in legend order.
    pub series: Vec<Series>,
    /// X-axis title.
    pub x_axis: String,
    /// Y-axis title.
    pub y_axis: String,
    /// Y-axis scale.
    #[serde(default)]
    pub y_scale: AxisScale,
    /// Horizontal reference lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartSpec {
    /// Create a new builder.
    pub fn builder(title: impl Into<String>) -> ChartSpecBuilder {
        ChartSpecBuilder {
            title: title.into(),
            ..ChartSpecBuilder::default()
        }
    }

    /// Number of points along the x-axis.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the chart has no points.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up a series by name.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Builder for [`ChartSpec`]; `build` checks the equal-length invariant.
#[derive(Debug, Default)]
pub struct ChartSpecBuilder {
    title: String,
    kind: ChartKind,
    labels: Vec<String>,
    series: Vec<Series>,
    x_axis: String,
    y_axis: String,
    y_scale: AxisScale,
    reference_lines: Vec<ReferenceLine>,
}

impl ChartSpecBuilder {
    /// Set the chart kind.
    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the x-axis labels.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Append a series.
    pub fn series(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.series.push(Series {
            name: name.into(),
            values,
        });
        self
    }

    /// Set both axis titles.
    pub fn axes(mut self, x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        self.x_axis = x_axis.into();
        self.y_axis = y_axis.into();
        self
    }

    /// Set the y-axis scale.
    pub fn y_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    /// Add a horizontal reference line.
    pub fn reference_line(mut self, name: impl Into<String>, value: f64) -> Self {
        self.reference_lines.push(ReferenceLine {
            name: name.into(),
            value,
        });
        self
    }

    /// Build the spec.
    pub fn build(self) -> Result<ChartSpec, ChartSpecError> {
        let mut seen = std::collections::HashSet::new();
        for series in &self.series {
            if series.values.len() != self.labels.len() {
                return Err(ChartSpecError::LengthMismatch {
                    series: series.name.clone(),
                    labels: self.labels.len(),
                    values: series.values.len(),
                });
            }
            if !seen.insert(series.name.as_str()) {
                return Err(ChartSpecError::DuplicateSeries(series.name.clone()));
            }
        }

        Ok(ChartSpec {
            title: self.title,
            kind: self.kind,
            labels: self.labels,
            series: self.series,
            x_axis: self.x_axis,
            y_axis: self.y_axis,
            y_scale: self.y_scale,
            reference_lines: self.reference_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_series_order() {
        let spec = ChartSpec::builder("Intersect")
            .labels(["2", "4"])
            .series("Tree", vec![1.0, 2.0])
            .series("Vector", vec![0.5, 1.0])
            .axes("Sketch size", "Latency (ms)")
            .build()
            .unwrap();

        assert_eq!(spec.len(), 2);
        let names: Vec<_> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Tree", "Vector"]);
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.y_scale, AxisScale::Linear);
    }

    #[test]
    fn test_builder_rejects_length_mismatch() {
        let err = ChartSpec::builder("x")
            .labels(["a", "b", "c"])
            .series("short", vec![1.0])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ChartSpecError::LengthMismatch {
                series: "short".to_string(),
                labels: 3,
                values: 1,
            }
        );
    }

    #[test]
    fn test_builder_rejects_duplicate_series() {
        let err = ChartSpec::builder("x")
            .labels(["a"])
            .series("s", vec![1.0])
            .series("s", vec![2.0])
            .build()
            .unwrap_err();
        assert_eq!(err, ChartSpecError::DuplicateSeries("s".to_string()));
    }

    #[test]
    fn test_empty_chart_is_valid() {
        let spec = ChartSpec::builder("empty").series("s", Vec::new()).build().unwrap();
        assert!(spec.is_empty());
        assert!(spec.series("s").is_some());
    }

    #[test]
    fn test_serializes_snake_case_enums() {
        let spec = ChartSpec::builder("q")
            .kind(ChartKind::Bar)
            .y_scale(AxisScale::Logarithmic)
            .reference_line("Ground truth", 1.0)
            .build()
            .unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "bar");
        assert_eq!(json["y_scale"], "logarithmic");
        assert_eq!(json["reference_lines"][0]["value"], 1.0);
    }
}
