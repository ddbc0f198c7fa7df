// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Suite-specific chart shaping.
//!
//! Each benchmark suite lays its records out differently, so every suite
//! family has its own [`Shaper`] variant turning one [`ResultFile`] into one
//! or more [`ChartSpec`]s. Suites are matched by substring of the suite name
//! (`min_hash_v2` is a `min_hash` suite); anything unrecognised falls back
//! to [`Shaper::Generic`], which plots every record's `real_time`.
//!
//! Record names are slash-delimited, `Fixture/Benchmark/arg0/arg1...`;
//! segment 0 is the fixture.

use crate::aggregate::AggregateMode;
use benchscope_benchmarks::{
    markdown::format_value, AxisScale, BenchmarkRecord, ChartKind, ChartSpec, ChartSpecError,
    ResultFile,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when records do not fit a suite's chart layout.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    /// Two subsets plotted against the same labels differ in length
    #[error("'{left}' has {left_len} records but '{right}' has {right_len}")]
    MisalignedSeries {
        /// First subset
        left: &'static str,
        /// Records in the first subset
        left_len: usize,
        /// Second subset
        right: &'static str,
        /// Records in the second subset
        right_len: usize,
    },

    /// A record lacks a field the chart needs
    #[error("record '{record}' has no {field}")]
    MissingField {
        /// Record name
        record: String,
        /// Field the chart needs
        field: &'static str,
    },

    /// The shaped data violates a chart invariant
    #[error(transparent)]
    Chart(#[from] ChartSpecError),
}

/// Result type for shaping.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// The closed set of chart layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shaper {
    /// Tree vs Vector MinHash intersection latency over sketch size
    MinHash,
    /// OmniSketch insert throughput over inserted records
    OmniInsert,
    /// OmniSketch point-query throughput, nested vs flattened
    OmniProbe,
    /// Star Schema Benchmark latency and estimation error per query
    Ssb,
    /// Fallback: `real_time` per record
    Generic,
}

/// Suite name keys, most specific first.
const SUITE_KEYS: [(&str, Shaper); 4] = [
    ("omni_probe", Shaper::OmniProbe),
    ("omni_insert", Shaper::OmniInsert),
    ("min_hash", Shaper::MinHash),
    ("ssb", Shaper::Ssb),
];

const TREE_MARKER: &str = "Tree";
const VECTOR_MARKER: &str = "Vector";
const POINT_QUERY: &str = "PointQuery";
const POINT_QUERY_FLATTENED: &str = "PointQueryFlattened";

impl Shaper {
    /// Pick the shaper for a suite directory name (a trailing `/` is ignored).
    pub fn for_suite(suite: &str) -> Self {
        let name = suite.trim_end_matches('/');
        SUITE_KEYS
            .iter()
            .find(|(key, _)| name.contains(key))
            .map(|(_, shaper)| *shaper)
            .unwrap_or(Shaper::Generic)
    }

    /// Stable identifier.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MinHash => "min_hash",
            Self::OmniInsert => "omni_insert",
            Self::OmniProbe => "omni_probe",
            Self::Ssb => "ssb",
            Self::Generic => "generic",
        }
    }

    /// How the combined view of suites of this kind is aggregated.
    pub fn combined_mode(&self) -> AggregateMode {
        match self {
            Self::Ssb => AggregateMode::total_real_time_ms(),
            _ => AggregateMode::median_real_time(),
        }
    }

    /// Shape one iteration file into charts.
    pub fn shape(&self, file: &ResultFile) -> Result<Vec<ChartSpec>> {
        let records: Vec<&BenchmarkRecord> = file.iterations().collect();
        let label = file.display_label();

        let charts = match self {
            Self::MinHash => vec![min_hash(&records, &label)?],
            Self::OmniInsert => vec![omni_insert(&records, &label)?],
            Self::OmniProbe => vec![omni_probe(&records, &label)?],
            Self::Ssb => ssb(&records, &label)?,
            Self::Generic => vec![generic(&records, &label)?],
        };

        tracing::debug!(
            shaper = self.key(),
            file = %file.filename,
            records = records.len(),
            charts = charts.len(),
            "Shaped result file"
        );
        Ok(charts)
    }
}

/// The name segment at `index` when it is numeric, else the 1-based position.
fn parameter_label(record: &BenchmarkRecord, index: usize, position: usize) -> String {
    match record.segment(index) {
        Some(segment) if segment.parse::<f64>().is_ok() => segment.to_string(),
        _ => (position + 1).to_string(),
    }
}

fn items_per_second(records: &[&BenchmarkRecord]) -> Result<Vec<f64>> {
    records
        .iter()
        .map(|r| {
            r.items_per_second.ok_or_else(|| ShapeError::MissingField {
                record: r.name.clone(),
                field: "items_per_second",
            })
        })
        .collect()
}

fn ensure_aligned(
    left: &'static str,
    left_len: usize,
    right: &'static str,
    right_len: usize,
) -> Result<()> {
    if left_len == right_len {
        Ok(())
    } else {
        Err(ShapeError::MisalignedSeries {
            left,
            left_len,
            right,
            right_len,
        })
    }
}

fn min_hash(records: &[&BenchmarkRecord], label: &str) -> Result<ChartSpec> {
    let tree: Vec<_> = records
        .iter()
        .copied()
        .filter(|r| r.name.contains(TREE_MARKER))
        .collect();
    let vector: Vec<_> = records
        .iter()
        .copied()
        .filter(|r| r.name.contains(VECTOR_MARKER))
        .collect();
    ensure_aligned(TREE_MARKER, tree.len(), VECTOR_MARKER, vector.len())?;

    Ok(ChartSpec::builder(format!("MinHash intersection ({label})"))
        .labels(
            tree.iter()
                .enumerate()
                .map(|(i, r)| parameter_label(r, 2, i)),
        )
        .series(TREE_MARKER, tree.iter().map(|r| r.real_time_ms()).collect())
        .series(VECTOR_MARKER, vector.iter().map(|r| r.real_time_ms()).collect())
        .axes("MinHash sketch size", "Latency (ms)")
        .build()?)
}

/// Batch size of an insert benchmark: its last numeric name segment after
/// the fixture.
fn batch_size(record: &BenchmarkRecord) -> f64 {
    let segments = record.name.split('/').count();
    (1..segments)
        .rev()
        .find_map(|index| record.numeric_segment(index))
        .unwrap_or(1.0)
}

fn omni_insert(records: &[&BenchmarkRecord], label: &str) -> Result<ChartSpec> {
    Ok(ChartSpec::builder(format!("OmniSketch insert ({label})"))
        .labels(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| format_value((i + 1) as f64 * batch_size(r))),
        )
        .series("Throughput", items_per_second(records)?)
        .axes("# records inserted", "Throughput (items/s)")
        .build()?)
}

fn omni_probe(records: &[&BenchmarkRecord], label: &str) -> Result<ChartSpec> {
    let nested: Vec<_> = records
        .iter()
        .copied()
        .filter(|r| r.segment(1) == Some(POINT_QUERY))
        .collect();
    let flattened: Vec<_> = records
        .iter()
        .copied()
        .filter(|r| r.segment(1) == Some(POINT_QUERY_FLATTENED))
        .collect();
    ensure_aligned(POINT_QUERY, nested.len(), POINT_QUERY_FLATTENED, flattened.len())?;

    Ok(ChartSpec::builder(format!("OmniSketch probe ({label})"))
        .labels(
            flattened
                .iter()
                .enumerate()
                .map(|(i, r)| parameter_label(r, 2, i)),
        )
        .series(POINT_QUERY, items_per_second(&nested)?)
        .series(POINT_QUERY_FLATTENED, items_per_second(&flattened)?)
        .axes("MinHash sketch size", "Throughput (probes/s)")
        .y_scale(AxisScale::Logarithmic)
        .build()?)
}

/// `Query1_1` becomes `1.1`; other names are kept as they are.
fn query_label(record: &BenchmarkRecord) -> String {
    let segment = record.segment(1).unwrap_or(&record.name);
    segment
        .strip_prefix("Query")
        .and_then(|id| id.split_once('_'))
        .map(|(major, minor)| format!("{major}.{minor}"))
        .unwrap_or_else(|| segment.to_string())
}

/// The record's estimation error: `QError`, `Q-Error`, or the last of the
/// per-join `QErr<n>` counters, which covers the complete query.
fn estimation_error(record: &BenchmarkRecord) -> Option<f64> {
    record
        .counter("QError")
        .or_else(|| record.counter("Q-Error"))
        .or_else(|| {
            record
                .extra
                .keys()
                .filter_map(|key| {
                    key.strip_prefix("QErr")
                        .and_then(|n| n.parse::<usize>().ok())
                        .map(|n| (n, key))
                })
                .max_by_key(|(n, _)| *n)
                .and_then(|(_, key)| record.counter(key))
        })
}

fn ssb(records: &[&BenchmarkRecord], label: &str) -> Result<Vec<ChartSpec>> {
    let labels: Vec<String> = records.iter().map(|r| query_label(r)).collect();
    let errors = records
        .iter()
        .map(|r| {
            estimation_error(r).ok_or_else(|| ShapeError::MissingField {
                record: r.name.clone(),
                field: "estimation error (QError)",
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let latency = ChartSpec::builder(format!("SSB latency ({label})"))
        .kind(ChartKind::Bar)
        .labels(labels.clone())
        .series("Latency", records.iter().map(|r| r.real_time_ms()).collect())
        .axes("Query", "Latency (ms)")
        .build()?;

    let error = ChartSpec::builder(format!("SSB estimation error ({label})"))
        .kind(ChartKind::Bar)
        .labels(labels)
        .series("Q-Error", errors)
        .axes("Query", "Q-Error")
        .y_scale(AxisScale::Logarithmic)
        .reference_line("Ground truth", 1.0)
        .build()?;

    Ok(vec![latency, error])
}

fn generic(records: &[&BenchmarkRecord], label: &str) -> Result<ChartSpec> {
    Ok(ChartSpec::builder(format!("Benchmark: {label}"))
        .kind(ChartKind::Bar)
        .labels(records.iter().map(|r| r.name.clone()))
        .series("real_time", records.iter().map(|r| r.real_time_ns()).collect())
        .axes("Benchmark", "Real Time (ns)")
        .build()?)
}
