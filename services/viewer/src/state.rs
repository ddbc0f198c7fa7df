// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared application state.

use crate::render::ChartBoard;
use benchscope_core::{Controller, RenderOptions, ResultSource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::{Arc, Mutex};

/// State shared by every handler.
pub struct AppState {
    /// Selection state and transitions of the page.
    pub controller: Controller,
    /// Charts currently drawn on the page.
    pub board: Mutex<ChartBoard>,
    /// Prometheus exporter, when installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State reading from `source`.
    pub fn new(source: Arc<dyn ResultSource>, options: RenderOptions) -> Self {
        Self {
            controller: Controller::new(source, options),
            board: Mutex::new(ChartBoard::new()),
            metrics: None,
        }
    }

    /// Attach the Prometheus handle served at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// The result source.
    pub fn source(&self) -> &Arc<dyn ResultSource> {
        self.controller.source()
    }

    /// Render options for stateless API requests.
    pub fn options(&self) -> &RenderOptions {
        self.controller.options()
    }
}
