// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Health and metrics endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::middleware::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: state.source().describe(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    state.metrics.as_ref().map(|handle| handle.render()).ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            "METRICS_DISABLED",
            "no metrics recorder is installed",
        )
    })
}
