// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! One render cycle: load, aggregate or shape, produce chart specs.

use crate::aggregate::{self, AggregateMode};
use crate::error::{Error, Result};
use crate::shaper::Shaper;
use crate::source::{self, ResultSource};
use benchscope_benchmarks::{ChartSpec, COMBINED_ITERATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The iteration half of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "file")]
pub enum Selection {
    /// Aggregate over every iteration of the suite.
    #[default]
    Combined,
    /// A single iteration file.
    File(String),
}

impl Selection {
    /// Parse a form/query value; the combined marker and an empty value both
    /// select the combined view.
    pub fn from_param(value: &str) -> Self {
        if value.is_empty() || value == COMBINED_ITERATION {
            Self::Combined
        } else {
            Self::File(value.to_string())
        }
    }

    /// The form/query value of this selection.
    pub fn as_param(&self) -> &str {
        match self {
            Self::Combined => COMBINED_ITERATION,
            Self::File(file) => file,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combined => f.write_str("combined"),
            Self::File(file) => f.write_str(file),
        }
    }
}

/// Knobs of the render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// How many iteration files the combined view loads at once.
    pub concurrency: usize,
    /// Aggregation used by the combined view instead of the suite default.
    pub aggregate: Option<AggregateMode>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            aggregate: None,
        }
    }
}

/// Produce the charts of `suite` for `selection`.
///
/// `files` is the suite's iteration listing; the combined view aggregates
/// over all of it, a single-file selection loads just that file.
pub async fn render_charts(
    source: &dyn ResultSource,
    suite: &str,
    selection: &Selection,
    files: &[String],
    options: &RenderOptions,
) -> Result<Vec<ChartSpec>> {
    let shaper = Shaper::for_suite(suite);

    match selection {
        Selection::Combined => {
            let mode = options
                .aggregate
                .clone()
                .unwrap_or_else(|| shaper.combined_mode());
            let loaded = source::load_all(source, suite, files, options.concurrency).await?;
            let points = aggregate::aggregate(&loaded, &mode);
            tracing::info!(
                suite,
                %mode,
                files = files.len(),
                points = points.len(),
                "Aggregated combined view"
            );

            let name = suite.trim_end_matches('/');
            Ok(vec![aggregate::combined_chart(name, &points, &mode)
                .map_err(crate::shaper::ShapeError::from)?])
        }
        Selection::File(file) => {
            let loaded = source.load(suite, file).await?;
            Ok(shaper.shape(&loaded)?)
        }
    }
}

/// List `suite`, check the selection against the listing, then render.
///
/// The stateless form of a selection change, used where no viewer state is
/// kept between requests. Suite names that would leave the results root
/// are rejected before anything is listed.
pub async fn render_suite(
    source: &dyn ResultSource,
    suite: &str,
    selection: &Selection,
    options: &RenderOptions,
) -> Result<Vec<ChartSpec>> {
    source::check_entry(suite)?;
    let files = source.list_iterations(suite).await?;
    if let Selection::File(file) = selection {
        if !files.contains(file) {
            return Err(Error::UnknownIteration {
                suite: suite.to_string(),
                iteration: file.clone(),
            });
        }
    }

    render_charts(source, suite, selection, &files, options).await
}
