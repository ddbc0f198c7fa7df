// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Combining iteration files into one series.
//!
//! The combined view of a suite reduces every iteration file to a single
//! point, either the median or the sum of one record field. Points are
//! always emitted in file-name order, whatever order the files were loaded
//! in, and files without any usable value are skipped.

use crate::stats;
use benchscope_benchmarks::{BenchmarkRecord, ChartKind, ChartSpec, ChartSpecError, ResultFile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The record value an aggregation reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "name")]
pub enum RecordField {
    /// `real_time` in nanoseconds
    RealTimeNs,
    /// `real_time` in milliseconds
    RealTimeMs,
    /// `items_per_second`
    ItemsPerSecond,
    /// A named user counter
    Counter(String),
}

impl RecordField {
    /// Read the field from a record.
    pub fn value(&self, record: &BenchmarkRecord) -> Option<f64> {
        match self {
            Self::RealTimeNs => Some(record.real_time_ns()),
            Self::RealTimeMs => Some(record.real_time_ms()),
            Self::ItemsPerSecond => record.items_per_second,
            Self::Counter(key) => record.counter(key),
        }
    }

    /// Axis title for values of this field.
    pub fn axis_title(&self) -> String {
        match self {
            Self::RealTimeNs => "Real Time (ns)".to_string(),
            Self::RealTimeMs => "Real Time (ms)".to_string(),
            Self::ItemsPerSecond => "Throughput (items/s)".to_string(),
            Self::Counter(key) => key.clone(),
        }
    }
}

/// How each iteration file is reduced to one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum AggregateMode {
    /// Median of the field over the file's records, labelled by file name
    Median {
        /// Field reduced
        field: RecordField,
    },
    /// Sum of the field over the file's records, labelled by iteration date and commit
    Sum {
        /// Field reduced
        field: RecordField,
    },
}

impl AggregateMode {
    /// Median of `real_time` in nanoseconds.
    pub fn median_real_time() -> Self {
        Self::Median {
            field: RecordField::RealTimeNs,
        }
    }

    /// Total `real_time` in milliseconds.
    pub fn total_real_time_ms() -> Self {
        Self::Sum {
            field: RecordField::RealTimeMs,
        }
    }

    /// The field being aggregated.
    pub fn field(&self) -> &RecordField {
        match self {
            Self::Median { field } | Self::Sum { field } => field,
        }
    }

    /// Chart title for the combined view.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Median { .. } => "Median per Iteration",
            Self::Sum { .. } => "Total per Iteration",
        }
    }

    fn reduce(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Median { .. } => stats::median(values),
            Self::Sum { .. } => stats::sum(values),
        }
    }

    fn label(&self, file: &ResultFile) -> String {
        match self {
            Self::Median { .. } => file.filename.clone(),
            Self::Sum { .. } => file.display_label(),
        }
    }
}

impl fmt::Display for AggregateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median { field } => write!(f, "median of {}", field.axis_title()),
            Self::Sum { field } => write!(f, "sum of {}", field.axis_title()),
        }
    }
}

/// One point of the combined series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatePoint {
    /// Axis label.
    pub label: String,
    /// Source file name.
    pub filename: String,
    /// Aggregated value.
    pub value: f64,
}

/// Reduce every file to one point, in file-name order.
///
/// Only iteration records are considered; a file without any record
/// carrying the field produces no point.
pub fn aggregate(files: &[ResultFile], mode: &AggregateMode) -> Vec<AggregatePoint> {
    let mut ordered: Vec<&ResultFile> = files.iter().collect();
    ordered.sort_by(|a, b| a.filename.cmp(&b.filename));

    ordered
        .into_iter()
        .filter_map(|file| {
            let values: Vec<f64> = file
                .iterations()
                .filter_map(|record| mode.field().value(record))
                .collect();

            match mode.reduce(&values) {
                Some(value) => Some(AggregatePoint {
                    label: mode.label(file),
                    filename: file.filename.clone(),
                    value,
                }),
                None => {
                    tracing::debug!(file = %file.filename, %mode, "Skipping iteration without values");
                    None
                }
            }
        })
        .collect()
}

/// Build the combined-view chart from aggregated points.
pub fn combined_chart(
    suite: &str,
    points: &[AggregatePoint],
    mode: &AggregateMode,
) -> Result<ChartSpec, ChartSpecError> {
    ChartSpec::builder(format!("{}: {}", suite, mode.title()))
        .kind(ChartKind::Line)
        .labels(points.iter().map(|p| p.label.clone()))
        .series(
            mode.field().axis_title(),
            points.iter().map(|p| p.value).collect(),
        )
        .axes("Iteration", mode.field().axis_title())
        .build()
}
