// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! benchscope viewer service.
//!
//! Serves a page with a suite selector, an iteration selector (every file of
//! the suite plus a combined view) and the charts of the current selection,
//! alongside stateless JSON endpoints over the same pipeline.

pub mod config;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::ViewerConfig;
pub use state::AppState;

/// Build the router with all routes and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::page::routes())
        .merge(routes::api::routes())
        .merge(routes::system::routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(
            middleware::request_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
