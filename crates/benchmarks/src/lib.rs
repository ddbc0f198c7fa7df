// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result model for benchscope.
//!
//! This crate holds the types shared by every benchscope component: the
//! records read from Google Benchmark JSON files, the iteration file name
//! contract, and the chart specs produced from them.
//!
//! # Quick Start
//!
//! ```no_run
//! use benchscope_benchmarks::ResultFile;
//!
//! let json = std::fs::read("benchmark_results/ssb/ssb_240305_abc123.json").unwrap();
//! let file = ResultFile::from_slice("ssb_240305_abc123.json", &json).unwrap();
//!
//! for record in file.iterations() {
//!     println!("{}: {} ns", record.name, record.real_time_ns());
//! }
//! println!("{}", file.display_label());
//! ```
//!
//! # Modules
//!
//! - [`result`] - `BenchmarkRecord` and `ResultFile`
//! - [`iteration`] - The `<prefix>_<YYMMDD>_<commit>.json` name parser
//! - [`chart`] - `ChartSpec` and its builder
//! - [`io`] - Reading result files and writing chart exports
//! - [`markdown`] - Markdown rendering of charts

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod chart;
pub mod io;
pub mod iteration;
pub mod markdown;
pub mod result;

pub use chart::{AxisScale, ChartKind, ChartSpec, ChartSpecBuilder, ChartSpecError, ReferenceLine, Series};
pub use iteration::IterationName;
pub use result::{BenchmarkRecord, ResultFile, ResultFileError};

/// Synthetic iteration entry selecting the aggregate view of a suite.
pub const COMBINED_ITERATION: &str = "__combined__";
