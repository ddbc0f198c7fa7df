// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result types.
//!
//! This module provides the record and file types read from Google
//! Benchmark JSON output (`--benchmark_format=json`).

use crate::iteration::IterationName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while decoding a result file.
#[derive(Debug, Error)]
pub enum ResultFileError {
    /// The document is not valid JSON
    #[error("invalid JSON in {filename}: {source}")]
    InvalidJson {
        /// File being decoded
        filename: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// The document has no top-level `benchmarks` array
    #[error("{filename} has no `benchmarks` array")]
    MissingBenchmarks {
        /// File being decoded
        filename: String,
    },

    /// One entry of `benchmarks` does not decode as a record
    #[error("record #{index} in {filename} is malformed: {source}")]
    InvalidRecord {
        /// File being decoded
        filename: String,
        /// Position of the record in `benchmarks`
        index: usize,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for result file decoding.
pub type Result<T> = std::result::Result<T, ResultFileError>;

/// One measured sample as emitted by the benchmarking tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Slash-delimited hierarchical name, e.g. `Fixture/PointQuery/256`.
    pub name: String,
    /// Wall-clock time per iteration, in `time_unit`.
    pub real_time: f64,
    /// Throughput reported through `SetItemsProcessed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_second: Option<f64>,
    /// `iteration` or `aggregate`; absent in older outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_type: Option<String>,
    /// Unit of `real_time`; nanoseconds when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<String>,
    /// User counters and every other field of the record.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BenchmarkRecord {
    /// Create an iteration record with the given name and time in nanoseconds.
    pub fn new(name: impl Into<String>, real_time_ns: f64) -> Self {
        Self {
            name: name.into(),
            real_time: real_time_ns,
            items_per_second: None,
            run_type: None,
            time_unit: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the throughput.
    pub fn with_items_per_second(mut self, items_per_second: f64) -> Self {
        self.items_per_second = Some(items_per_second);
        self
    }

    /// Add a user counter.
    pub fn with_counter(mut self, key: impl Into<String>, value: f64) -> Self {
        self.extra.insert(key.into(), serde_json::json!(value));
        self
    }

    /// Whether this is a measured iteration rather than an aggregate row.
    pub fn is_iteration(&self) -> bool {
        self.run_type
            .as_deref()
            .map_or(true, |run_type| run_type == "iteration")
    }

    /// `real_time` normalised to nanoseconds.
    pub fn real_time_ns(&self) -> f64 {
        let factor = match self.time_unit.as_deref() {
            None | Some("ns") => 1.0,
            Some("us") => 1e3,
            Some("ms") => 1e6,
            Some("s") => 1e9,
            Some(other) => {
                tracing::warn!(record = %self.name, unit = other, "Unknown time unit, assuming ns");
                1.0
            }
        };
        self.real_time * factor
    }

    /// `real_time` in milliseconds.
    pub fn real_time_ms(&self) -> f64 {
        self.real_time_ns() / 1_000_000.0
    }

    /// A numeric counter stored among the extra fields.
    pub fn counter(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(serde_json::Value::as_f64)
    }

    /// The `index`-th slash-delimited segment of the name.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.name.split('/').nth(index)
    }

    /// The `index`-th name segment parsed as a number.
    pub fn numeric_segment(&self, index: usize) -> Option<f64> {
        self.segment(index).and_then(|s| s.parse().ok())
    }
}

/// The decoded content of one iteration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    /// File name within its suite directory, e.g. `bench_240305_abc123.json`.
    pub filename: String,
    /// Records in file order.
    pub records: Vec<BenchmarkRecord>,
}

impl ResultFile {
    /// Create a result file from already decoded records.
    pub fn new(filename: impl Into<String>, records: Vec<BenchmarkRecord>) -> Self {
        Self {
            filename: filename.into(),
            records,
        }
    }

    /// Decode a result file from raw bytes.
    pub fn from_slice(filename: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let filename = filename.into();
        let document: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|source| ResultFileError::InvalidJson {
                filename: filename.clone(),
                source,
            })?;
        Self::from_value(filename, document)
    }

    /// Decode a result file from a JSON string.
    pub fn from_json_str(filename: impl Into<String>, text: &str) -> Result<Self> {
        Self::from_slice(filename, text.as_bytes())
    }

    fn from_value(filename: String, document: serde_json::Value) -> Result<Self> {
        let Some(entries) = document.get("benchmarks").and_then(|b| b.as_array()) else {
            return Err(ResultFileError::MissingBenchmarks { filename });
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let record = BenchmarkRecord::deserialize(entry).map_err(|source| {
                ResultFileError::InvalidRecord {
                    filename: filename.clone(),
                    index,
                    source,
                }
            })?;
            records.push(record);
        }

        Ok(Self { filename, records })
    }

    /// Records that are measured iterations, in file order.
    pub fn iterations(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter().filter(|r| r.is_iteration())
    }

    /// Human-readable label, `05.3.24 [abc123]` for conforming names and the
    /// raw file name otherwise.
    pub fn display_label(&self) -> String {
        IterationName::display_label_for(&self.filename)
    }
}
