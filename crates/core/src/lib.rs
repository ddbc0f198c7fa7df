// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! # benchscope-core
//!
//! The viewer pipeline: listing and loading results through a
//! [`ResultSource`], reducing iterations to a combined series, shaping one
//! iteration into suite-specific charts, and the [`Controller`] that ties the
//! selections together.
//!
//! ## Modules
//!
//! - [`source`]: the `ResultSource` trait, listing filters and batch loading
//! - [`aggregate`]: median/sum per iteration for the combined view
//! - [`shaper`]: suite-specific chart layouts with a generic fallback
//! - [`pipeline`]: one render cycle from selection to chart specs
//! - [`controller`]: viewer state, carry-over and render generations
//! - [`error`]: error types

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod shaper;
pub mod source;
pub mod stats;

pub use aggregate::{aggregate, combined_chart, AggregateMode, AggregatePoint, RecordField};
pub use controller::{ChartView, Controller, RenderTicket, ViewerState};
pub use error::{Error, Result};
pub use pipeline::{render_charts, render_suite, RenderOptions, Selection};
pub use shaper::{ShapeError, Shaper};
pub use source::{check_entry, is_plain_entry, load_all, Listing, ResultSource};
