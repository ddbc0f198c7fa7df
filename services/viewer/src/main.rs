// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! benchscope viewer entry point.

use anyhow::Context;
use benchscope_viewer::config::{LogConfig, LogFormat};
use benchscope_viewer::{app, AppState, ViewerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ViewerConfig::load().context("invalid configuration")?;
    init_tracing(&config.log);

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    let source = config.source.build()?;
    let state = Arc::new(
        AppState::new(source, config.source.render_options()).with_metrics(metrics),
    );

    if let Err(err) = state.controller.load_suites().await {
        warn!(error = %err, "Initial suite listing failed");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, root = %config.source.root, "Viewer listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
