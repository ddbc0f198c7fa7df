// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! The viewer page and its two selection transitions.

use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use benchscope_benchmarks::{IterationName, COMBINED_ITERATION};
use benchscope_core::{ChartView, Error, Selection, ViewerState};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::middleware::ApiError;
use crate::render::escape_html;
use crate::state::AppState;

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

/// Suite selector form.
#[derive(Debug, Deserialize)]
pub struct SuiteForm {
    /// Suite directory.
    pub suite: String,
}

/// Iteration selector form.
#[derive(Debug, Deserialize)]
pub struct IterationForm {
    /// Iteration file or `__combined__`.
    pub iteration: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/select/suite", post(select_suite))
        .route("/select/iteration", post(select_iteration))
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut snapshot = state.controller.snapshot().await;
    if snapshot.suites.is_empty() && snapshot.suite_error.is_none() {
        if let Err(err) = state.controller.load_suites().await {
            warn!(error = %err, "Failed to list suites");
        }
        snapshot = state.controller.snapshot().await;
    }

    let charts = {
        let mut board = state
            .board
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        board.render(snapshot.view.charts());
        debug!(
            areas = board.areas().len(),
            disposed = board.disposed(),
            "Chart board rendered"
        );
        board.to_html()
    };

    Html(page(&state.source().describe(), &snapshot, &charts))
}

async fn select_suite(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SuiteForm>,
) -> Result<Redirect, ApiError> {
    match state.controller.select_suite(&form.suite).await {
        Ok(()) => Ok(Redirect::to("/")),
        Err(err @ Error::InvalidEntry { .. }) => Err(err.into()),
        Err(err) => {
            warn!(suite = %form.suite, error = %err, "Suite selection failed");
            Ok(Redirect::to("/"))
        }
    }
}

async fn select_iteration(
    State(state): State<Arc<AppState>>,
    Form(form): Form<IterationForm>,
) -> Result<Redirect, ApiError> {
    let selection = Selection::from_param(&form.iteration);
    match state.controller.select_iteration(selection).await {
        Ok(()) => Ok(Redirect::to("/")),
        Err(
            err @ (Error::UnknownIteration { .. }
            | Error::NoSuiteSelected
            | Error::ListingPending { .. }),
        ) => Err(err.into()),
        Err(err) => {
            warn!(iteration = %form.iteration, error = %err, "Iteration selection failed");
            Ok(Redirect::to("/"))
        }
    }
}

fn page(root: &str, state: &ViewerState, charts: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>benchscope</title>\n");
    writeln!(html, "<script src=\"{CHART_JS}\"></script>").unwrap();
    html.push_str("<style>body{font-family:sans-serif;margin:2rem}.chart{max-width:960px;margin-bottom:2rem}.error{color:#b00020}</style>\n");
    html.push_str("</head>\n<body>\n");
    writeln!(html, "<h1>benchscope</h1>\n<p>Results: <code>{}</code></p>", escape_html(root)).unwrap();

    suite_form(&mut html, state);
    if state.suite.is_some() {
        iteration_form(&mut html, state);
    }

    match &state.view {
        ChartView::Failed { message } => {
            writeln!(html, "<p class=\"error\" id=\"chart-error\">{}</p>", escape_html(message))
                .unwrap();
        }
        ChartView::Empty if state.suite.is_none() => {
            html.push_str("<p>Select a benchmark suite.</p>\n");
        }
        _ => {}
    }
    html.push_str(charts);

    html.push_str("</body>\n</html>\n");
    html
}

fn suite_form(html: &mut String, state: &ViewerState) {
    html.push_str("<form method=\"post\" action=\"/select/suite\">\n<label>Suite \n");
    html.push_str("<select name=\"suite\" onchange=\"this.form.submit()\">\n");
    if state.suite.is_none() {
        html.push_str("<option value=\"\" selected disabled>choose…</option>\n");
    }
    for suite in &state.suites {
        let selected = state.suite.as_deref() == Some(suite.as_str());
        option(html, suite, suite.trim_end_matches('/'), selected);
    }
    html.push_str("</select></label>\n<noscript><button>Show</button></noscript>\n</form>\n");

    if let Some(error) = &state.suite_error {
        writeln!(html, "<p class=\"error\" id=\"suite-error\">{}</p>", escape_html(error)).unwrap();
    }
}

fn iteration_form(html: &mut String, state: &ViewerState) {
    html.push_str("<form method=\"post\" action=\"/select/iteration\">\n<label>Iteration \n");
    html.push_str("<select name=\"iteration\" onchange=\"this.form.submit()\">\n");
    option(
        html,
        COMBINED_ITERATION,
        "All iterations (combined)",
        state.iteration == Selection::Combined,
    );
    for file in &state.iterations {
        let selected = matches!(&state.iteration, Selection::File(f) if f == file);
        option(html, file, &IterationName::display_label_for(file), selected);
    }
    html.push_str("</select></label>\n<noscript><button>Show</button></noscript>\n</form>\n");
}

fn option(html: &mut String, value: &str, label: &str, selected: bool) {
    writeln!(
        html,
        "<option value=\"{}\"{}>{}</option>",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_marks_selection() {
        let state = ViewerState {
            suites: vec!["min_hash/".to_string(), "ssb/".to_string()],
            suite: Some("ssb/".to_string()),
            iterations: vec!["ssb_240305_abc123.json".to_string()],
            iteration: Selection::File("ssb_240305_abc123.json".to_string()),
            ..Default::default()
        };

        let html = page("http://host/benchmark_results/", &state, "");
        assert!(html.contains("<option value=\"ssb/\" selected>ssb</option>"));
        assert!(html.contains("<option value=\"ssb_240305_abc123.json\" selected>05.3.24 [abc123]</option>"));
        assert!(html.contains("<option value=\"__combined__\">All iterations (combined)</option>"));
    }

    #[test]
    fn test_page_shows_errors() {
        let state = ViewerState {
            suite_error: Some("failed to fetch http://host/: status 503".to_string()),
            view: ChartView::Failed {
                message: "failed to fetch <x>".to_string(),
            },
            ..Default::default()
        };

        let html = page("root", &state, "");
        assert!(html.contains("id=\"suite-error\""));
        assert!(html.contains("failed to fetch &lt;x&gt;"));
        assert!(!html.contains("action=\"/select/iteration\""));
    }
}
