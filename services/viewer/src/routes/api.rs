// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Stateless JSON views of the pipeline.
//!
//! These do not touch the page selection; every request lists and loads
//! afresh.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use benchscope_benchmarks::{ChartSpec, IterationName};
use benchscope_core::{check_entry, render_suite, Selection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::middleware::{ApiError, ReqContext};
use crate::state::AppState;

/// Body of `GET /api/suites`.
#[derive(Debug, Serialize)]
pub struct SuitesResponse {
    /// Suite directories, each ending in `/`.
    pub suites: Vec<String>,
}

/// One iteration file and its display label.
#[derive(Debug, Serialize)]
pub struct IterationEntry {
    /// File name within the suite.
    pub file: String,
    /// `DD.M.YY [commit]`, or the file name.
    pub label: String,
}

/// Body of `GET /api/suites/:suite/iterations`.
#[derive(Debug, Serialize)]
pub struct IterationsResponse {
    /// Suite directory.
    pub suite: String,
    /// Iteration files, sorted.
    pub iterations: Vec<IterationEntry>,
}

/// Query of `GET /api/suites/:suite/charts`.
#[derive(Debug, Deserialize)]
pub struct ChartsQuery {
    /// Iteration file; absent or `__combined__` for the combined view.
    #[serde(default)]
    pub iteration: Option<String>,
}

/// Body of `GET /api/suites/:suite/charts`.
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    /// Suite directory.
    pub suite: String,
    /// Rendered selection.
    pub iteration: String,
    /// Charts of the selection.
    pub charts: Vec<ChartSpec>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/suites", get(list_suites))
        .route("/api/suites/:suite/iterations", get(list_iterations))
        .route("/api/suites/:suite/charts", get(charts))
}

/// Path segments carry the suite without its trailing slash.
fn suite_dir(suite: &str) -> String {
    format!("{}/", suite.trim_end_matches('/'))
}

async fn list_suites(State(state): State<Arc<AppState>>) -> Result<Json<SuitesResponse>, ApiError> {
    let suites = state.source().list_suites().await?;
    Ok(Json(SuitesResponse { suites }))
}

async fn list_iterations(
    State(state): State<Arc<AppState>>,
    Path(suite): Path<String>,
) -> Result<Json<IterationsResponse>, ApiError> {
    let suite = suite_dir(&suite);
    check_entry(&suite)?;
    let iterations = state
        .source()
        .list_iterations(&suite)
        .await?
        .into_iter()
        .map(|file| IterationEntry {
            label: IterationName::display_label_for(&file),
            file,
        })
        .collect();

    Ok(Json(IterationsResponse { suite, iterations }))
}

async fn charts(
    State(state): State<Arc<AppState>>,
    ReqContext(ctx): ReqContext,
    Path(suite): Path<String>,
    Query(query): Query<ChartsQuery>,
) -> Result<Json<ChartsResponse>, ApiError> {
    let suite = suite_dir(&suite);
    let selection = Selection::from_param(query.iteration.as_deref().unwrap_or_default());

    let charts = render_suite(state.source().as_ref(), &suite, &selection, state.options()).await?;
    info!(
        request_id = %ctx.request_id,
        suite = %suite,
        iteration = %selection,
        charts = charts.len(),
        "Charts rendered"
    );

    Ok(Json(ChartsResponse {
        iteration: selection.as_param().to_string(),
        suite,
        charts,
    }))
}
