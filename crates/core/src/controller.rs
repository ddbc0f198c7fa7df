// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Viewer state and its transitions.
//!
//! [`ViewerState`] holds the two selections (suite and iteration) and the
//! chart view. Its methods are the synchronous halves of each transition;
//! [`Controller`] wraps the state in a mutex and performs the fetches in
//! between, never holding the lock across an `.await`.
//!
//! Every transition that starts a fetch bumps the render generation and hands
//! out a [`RenderTicket`]. A result is applied only while its ticket is still
//! current, so a slow response cannot overwrite a newer chart. A suite switch
//! also records its listing as pending; iterations cannot be selected until
//! that listing has been applied.
//!
//! # Example
//!
//! ```no_run
//! use benchscope_core::{Controller, RenderOptions, ResultSource, Selection};
//! use std::sync::Arc;
//!
//! # async fn example(source: Arc<dyn ResultSource>) -> benchscope_core::Result<()> {
//! let controller = Controller::new(source, RenderOptions::default());
//! controller.load_suites().await?;
//! controller.select_suite("ssb/").await?;
//! controller.select_iteration(Selection::Combined).await?;
//!
//! let state = controller.snapshot().await;
//! println!("{} charts", state.view.charts().len());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::pipeline::{self, RenderOptions, Selection};
use crate::source::{self, ResultSource};
use benchscope_benchmarks::ChartSpec;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What the chart area currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ChartView {
    /// Nothing selected yet
    #[default]
    Empty,
    /// A render is in flight
    Loading,
    /// Charts of the current selection
    Ready {
        /// Charts in display order
        charts: Vec<ChartSpec>,
    },
    /// The last render failed; the previous charts are gone
    Failed {
        /// Error shown in place of the charts
        message: String,
    },
}

impl ChartView {
    /// Charts on display, empty unless ready.
    pub fn charts(&self) -> &[ChartSpec] {
        match self {
            Self::Ready { charts } => charts,
            _ => &[],
        }
    }
}

/// A started render, valid while its generation is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    /// Generation the render was started in.
    pub generation: u64,
    /// Suite being rendered.
    pub suite: String,
    /// Iteration selection being rendered.
    pub selection: Selection,
    /// Iteration listing of the suite at the time of the request.
    pub files: Vec<String>,
}

/// Selections, listings and chart view of one viewer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewerState {
    /// Suite directories, sorted.
    pub suites: Vec<String>,
    /// Why the suite listing is empty, if it failed.
    pub suite_error: Option<String>,
    /// Selected suite.
    pub suite: Option<String>,
    /// Iteration files of the selected suite, sorted.
    pub iterations: Vec<String>,
    /// Selected iteration, combined by default.
    pub iteration: Selection,
    /// Latest render generation.
    pub generation: u64,
    /// Generation of the suite listing in flight, if any.
    pub pending_listing: Option<u64>,
    /// Chart area.
    pub view: ChartView,
}

impl ViewerState {
    /// Apply the outcome of a suite listing.
    pub fn set_suites(&mut self, result: &Result<Vec<String>>) {
        match result {
            Ok(suites) => {
                self.suites = suites.clone();
                self.suite_error = None;
            }
            Err(err) => {
                self.suites.clear();
                self.suite_error = Some(err.to_string());
                self.view = ChartView::Failed {
                    message: err.to_string(),
                };
            }
        }
    }

    /// Start switching to `suite`; returns the generation of the switch.
    pub fn begin_suite(&mut self, suite: &str) -> u64 {
        self.suite = Some(suite.to_string());
        self.iterations.clear();
        let generation = self.bump();
        self.pending_listing = Some(generation);
        generation
    }

    /// Apply the iteration listing of a suite switch.
    ///
    /// The previous iteration stays selected if the new suite has a file of
    /// the same name, otherwise the combined view is selected. Returns the
    /// render to run, or `None` if the switch was superseded or the listing
    /// failed.
    pub fn finish_suite(
        &mut self,
        generation: u64,
        result: &Result<Vec<String>>,
    ) -> Option<RenderTicket> {
        if self.pending_listing != Some(generation) {
            debug!(
                generation,
                pending = ?self.pending_listing,
                "Dropping superseded suite listing"
            );
            metrics::counter!("benchscope_stale_render_total").increment(1);
            return None;
        }
        self.pending_listing = None;

        match result {
            Ok(files) => {
                let keep = matches!(&self.iteration, Selection::File(f) if files.contains(f));
                if !keep {
                    self.iteration = Selection::Combined;
                }
                self.iterations = files.clone();
                self.ticket()
            }
            Err(err) => {
                warn!(suite = ?self.suite, error = %err, "Failed to list iterations");
                self.iteration = Selection::Combined;
                self.view = ChartView::Failed {
                    message: err.to_string(),
                };
                None
            }
        }
    }

    /// Select an iteration of the current suite.
    ///
    /// Unknown files are rejected before anything is fetched, as is any
    /// selection made while the suite's listing is still pending.
    pub fn select_iteration(&mut self, selection: Selection) -> Result<RenderTicket> {
        let suite = self.suite.clone().ok_or(Error::NoSuiteSelected)?;
        if self.pending_listing.is_some() {
            return Err(Error::ListingPending { suite });
        }
        if let Selection::File(file) = &selection {
            if !self.iterations.contains(file) {
                return Err(Error::UnknownIteration {
                    suite,
                    iteration: file.clone(),
                });
            }
        }

        self.iteration = selection;
        self.bump();
        self.ticket().ok_or(Error::NoSuiteSelected)
    }

    /// Apply a finished render. Returns `false` if the ticket was superseded
    /// and the result dropped.
    pub fn complete_render(
        &mut self,
        ticket: &RenderTicket,
        result: &Result<Vec<ChartSpec>>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                suite = %ticket.suite,
                iteration = %ticket.selection,
                "Dropping stale render"
            );
            metrics::counter!("benchscope_stale_render_total").increment(1);
            return false;
        }

        self.view = match result {
            Ok(charts) => {
                metrics::counter!("benchscope_render_total", "outcome" => "ok").increment(1);
                ChartView::Ready {
                    charts: charts.clone(),
                }
            }
            Err(err) => {
                warn!(suite = %ticket.suite, iteration = %ticket.selection, error = %err, "Render failed");
                metrics::counter!("benchscope_render_total", "outcome" => err.code()).increment(1);
                ChartView::Failed {
                    message: err.to_string(),
                }
            }
        };
        true
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.view = ChartView::Loading;
        self.generation
    }

    fn ticket(&self) -> Option<RenderTicket> {
        Some(RenderTicket {
            generation: self.generation,
            suite: self.suite.clone()?,
            selection: self.iteration.clone(),
            files: self.iterations.clone(),
        })
    }
}

/// Drives [`ViewerState`] transitions against a [`ResultSource`].
pub struct Controller {
    source: Arc<dyn ResultSource>,
    state: Mutex<ViewerState>,
    options: RenderOptions,
}

impl Controller {
    /// Create a controller with an empty state.
    pub fn new(source: Arc<dyn ResultSource>, options: RenderOptions) -> Self {
        Self {
            source,
            state: Mutex::new(ViewerState::default()),
            options,
        }
    }

    /// The source results are read from.
    pub fn source(&self) -> &Arc<dyn ResultSource> {
        &self.source
    }

    /// Render options shared by every transition.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> ViewerState {
        self.state.lock().await.clone()
    }

    /// Refresh the suite list.
    pub async fn load_suites(&self) -> Result<()> {
        let result = self.source.list_suites().await;
        if let Ok(suites) = &result {
            info!(source = %self.source.describe(), count = suites.len(), "Loaded suites");
        }

        self.state.lock().await.set_suites(&result);
        result.map(|_| ())
    }

    /// Switch to `suite` and render its current iteration selection.
    ///
    /// Names that would leave the results root are rejected without touching
    /// the state.
    pub async fn select_suite(&self, suite: &str) -> Result<()> {
        source::check_entry(suite)?;
        let generation = self.state.lock().await.begin_suite(suite);

        let listing = self.source.list_iterations(suite).await;
        let ticket = self.state.lock().await.finish_suite(generation, &listing);
        listing?;

        match ticket {
            Some(ticket) => {
                info!(suite, iteration = %ticket.selection, files = ticket.files.len(), "Selected suite");
                self.render(ticket).await
            }
            None => Ok(()),
        }
    }

    /// Select an iteration of the current suite and render it.
    pub async fn select_iteration(&self, selection: Selection) -> Result<()> {
        let ticket = self.state.lock().await.select_iteration(selection)?;
        info!(suite = %ticket.suite, iteration = %ticket.selection, "Selected iteration");
        self.render(ticket).await
    }

    async fn render(&self, ticket: RenderTicket) -> Result<()> {
        let result = pipeline::render_charts(
            self.source.as_ref(),
            &ticket.suite,
            &ticket.selection,
            &ticket.files,
            &self.options,
        )
        .await;

        self.state.lock().await.complete_render(&ticket, &result);
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockResultSource;
    use benchscope_benchmarks::{BenchmarkRecord, ResultFile};

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn listing_source() -> MockResultSource {
        let mut source = MockResultSource::new();
        source.expect_describe().returning(|| "mock".to_string());
        source.expect_list_iterations().returning(|suite| match suite {
            "a/" | "b/" => Ok(files(&["run1.json", "run2.json"])),
            _ => Ok(files(&["run1.json"])),
        });
        source
    }

    fn one_record(file: &str) -> Result<ResultFile> {
        Ok(ResultFile::new(file, vec![BenchmarkRecord::new("x", 1.0)]))
    }

    #[test]
    fn test_carry_over_and_fallback() {
        let mut state = ViewerState::default();

        let generation = state.begin_suite("a/");
        let ticket = state
            .finish_suite(generation, &Ok(files(&["run1.json", "run2.json"])))
            .unwrap();
        assert_eq!(ticket.selection, Selection::Combined);

        state
            .select_iteration(Selection::File("run2.json".to_string()))
            .unwrap();

        let generation = state.begin_suite("b/");
        let ticket = state
            .finish_suite(generation, &Ok(files(&["run1.json", "run2.json"])))
            .unwrap();
        assert_eq!(ticket.selection, Selection::File("run2.json".to_string()));

        let generation = state.begin_suite("c/");
        let ticket = state
            .finish_suite(generation, &Ok(files(&["run1.json"])))
            .unwrap();
        assert_eq!(ticket.selection, Selection::Combined);
        assert_eq!(state.iteration, Selection::Combined);
    }

    #[test]
    fn test_unknown_iteration_rejected() {
        let mut state = ViewerState::default();
        assert!(matches!(
            state.select_iteration(Selection::Combined),
            Err(Error::NoSuiteSelected)
        ));

        let generation = state.begin_suite("a/");
        state.finish_suite(generation, &Ok(files(&["run1.json"])));
        let before = state.generation;

        let err = state
            .select_iteration(Selection::File("missing.json".to_string()))
            .unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ITERATION");
        assert_eq!(state.generation, before);
    }

    #[test]
    fn test_stale_render_dropped() {
        let mut state = ViewerState::default();
        let generation = state.begin_suite("a/");
        state.finish_suite(generation, &Ok(files(&["run1.json"])));

        let slow = state
            .select_iteration(Selection::File("run1.json".to_string()))
            .unwrap();
        let fast = state.select_iteration(Selection::Combined).unwrap();

        assert!(state.complete_render(&fast, &Ok(Vec::new())));
        assert!(!state.complete_render(
            &slow,
            &Err(Error::fetch("run1.json", "too late"))
        ));
        assert_eq!(state.view, ChartView::Ready { charts: Vec::new() });
    }

    #[test]
    fn test_superseded_suite_listing_dropped() {
        let mut state = ViewerState::default();
        let first = state.begin_suite("a/");
        let second = state.begin_suite("b/");

        assert!(state.finish_suite(first, &Ok(files(&["old.json"]))).is_none());
        assert!(state.finish_suite(second, &Ok(files(&["new.json"]))).is_some());
        assert_eq!(state.iterations, vec!["new.json"]);
    }

    #[test]
    fn test_failed_render_clears_charts() {
        let mut state = ViewerState::default();
        let generation = state.begin_suite("a/");
        let ticket = state.finish_suite(generation, &Ok(files(&["run1.json"]))).unwrap();
        state.complete_render(&ticket, &Ok(Vec::new()));

        let ticket = state.select_iteration(Selection::Combined).unwrap();
        state.complete_render(&ticket, &Err(Error::parse("run1.json", "missing benchmarks")));
        assert!(state.view.charts().is_empty());
        assert!(matches!(state.view, ChartView::Failed { .. }));
    }

    #[tokio::test]
    async fn test_load_suites_failure_leaves_empty_list() {
        let mut source = MockResultSource::new();
        source
            .expect_list_suites()
            .times(1)
            .returning(|| Err(Error::fetch("http://host/benchmark_results/", "status 503")));

        let controller = Controller::new(Arc::new(source), RenderOptions::default());
        assert!(controller.load_suites().await.is_err());

        let state = controller.snapshot().await;
        assert!(state.suites.is_empty());
        assert!(state.suite_error.unwrap().contains("status 503"));
    }

    #[tokio::test]
    async fn test_select_suite_renders_once() {
        let mut source = listing_source();
        source
            .expect_load()
            .times(2)
            .returning(|_, file| one_record(file));

        let controller = Controller::new(Arc::new(source), RenderOptions::default());
        controller.select_suite("a/").await.unwrap();

        let state = controller.snapshot().await;
        assert_eq!(state.suite.as_deref(), Some("a/"));
        assert_eq!(state.iteration, Selection::Combined);
        assert_eq!(state.view.charts().len(), 1);
    }

    #[tokio::test]
    async fn test_select_iteration_loads_exactly_one_file() {
        let mut source = listing_source();
        source
            .expect_load()
            .times(1)
            .returning(|_, file| one_record(file));

        let controller = Controller::new(Arc::new(source), RenderOptions::default());
        {
            let mut state = controller.state.lock().await;
            let generation = state.begin_suite("c/");
            state.finish_suite(generation, &Ok(files(&["run1.json"])));
        }

        controller
            .select_iteration(Selection::File("run1.json".to_string()))
            .await
            .unwrap();

        let state = controller.snapshot().await;
        assert_eq!(state.view.charts()[0].labels, vec!["x"]);
    }

    #[tokio::test]
    async fn test_unknown_iteration_does_not_fetch() {
        let mut source = listing_source();
        source.expect_load().times(2).returning(|_, file| one_record(file));

        let controller = Controller::new(Arc::new(source), RenderOptions::default());
        controller.select_suite("a/").await.unwrap();

        let err = controller
            .select_iteration(Selection::File("run9.json".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ITERATION");
    }

    #[tokio::test]
    async fn test_failed_load_surfaces_error_view() {
        let mut source = listing_source();
        source
            .expect_load()
            .returning(|_, file| Err(Error::fetch(file, "status 404")));

        let controller = Controller::new(Arc::new(source), RenderOptions::default());
        let err = controller.select_suite("c/").await.unwrap_err();
        assert_eq!(err.code(), "FETCH_FAILED");

        let state = controller.snapshot().await;
        match state.view {
            ChartView::Failed { message } => assert!(message.contains("status 404")),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_selection_waits_for_pending_listing() {
        let mut state = ViewerState::default();
        let generation = state.begin_suite("a/");
        state.finish_suite(generation, &Ok(files(&["run1.json"])));

        let generation = state.begin_suite("b/");
        let err = state.select_iteration(Selection::Combined).unwrap_err();
        assert_eq!(err.code(), "LISTING_PENDING");
        assert_eq!(state.generation, generation);

        let ticket = state
            .finish_suite(generation, &Ok(files(&["x.json", "y.json"])))
            .unwrap();
        assert_eq!(ticket.files, vec!["x.json", "y.json"]);
        assert_eq!(state.iterations, vec!["x.json", "y.json"]);
        assert!(state.pending_listing.is_none());

        let ticket = state.select_iteration(Selection::Combined).unwrap();
        assert_eq!(ticket.files.len(), 2);
    }

    #[tokio::test]
    async fn test_select_suite_rejects_escaping_name() {
        let mut source = MockResultSource::new();
        source.expect_list_iterations().times(0);
        source.expect_load().times(0);

        let controller = Controller::new(Arc::new(source), RenderOptions::default());
        for suite in ["../private/", "/tmp/private/"] {
            let err = controller.select_suite(suite).await.unwrap_err();
            assert_eq!(err.code(), "INVALID_ENTRY");
        }

        let state = controller.snapshot().await;
        assert!(state.suite.is_none());
        assert_eq!(state.generation, 0);
    }
}
