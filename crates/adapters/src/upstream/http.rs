// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Results served over HTTP by a static file server.
//!
//! The results root is a URL such as `http://host/benchmark_results/`; every
//! suite is a subdirectory with an autoindex page, every iteration a JSON
//! file inside it. Nothing is cached: each listing and each load is a fresh
//! GET.
//!
//! # Example
//!
//! ```no_run
//! use benchscope_adapters::upstream::http::HttpSource;
//! use benchscope_core::ResultSource;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpSource::new("http://localhost:8000/benchmark_results", Duration::from_secs(10))?;
//! for suite in source.list_suites().await? {
//!     println!("{suite}");
//! }
//! # Ok(())
//! # }
//! ```

use super::autoindex;
use super::config::SourceConfigError;
use async_trait::async_trait;
use benchscope_benchmarks::ResultFile;
use benchscope_core::{check_entry, Error, Listing, Result, ResultSource};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

/// A [`ResultSource`] backed by an HTTP directory tree.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    root: Url,
}

impl HttpSource {
    /// Create a source rooted at `root`; a missing trailing `/` is added.
    pub fn new(root: &str, timeout: Duration) -> std::result::Result<Self, SourceConfigError> {
        let root = parse_root(root)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, root))
    }

    /// Create a source that shares an existing client.
    pub fn with_client(client: reqwest::Client, mut root: Url) -> Self {
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Self { client, root }
    }

    /// The root URL, always ending in `/`.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// URL of `path` below the root; directories keep their trailing `/`.
    fn url(&self, path: &str) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
            if path.is_empty() || path.ends_with('/') {
                segments.push("");
            }
        }
        url
    }

    async fn get(&self, url: Url, kind: &'static str) -> Result<Vec<u8>> {
        let result = self.fetch(&url).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!("benchscope_fetch_total", "kind" => kind, "outcome" => outcome)
            .increment(1);

        if let Err(err) = &result {
            warn!(url = %url, kind, error = %err, "Fetch failed");
        }
        result
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url.as_str(), format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(url.as_str(), e))?;
        debug!(url = %url, bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }

    async fn listing(&self, path: &str) -> Result<Listing> {
        let url = self.url(path);
        let body = self.get(url.clone(), "listing").await?;
        let html = String::from_utf8_lossy(&body);
        autoindex::parse_listing(&html).map_err(|e| Error::parse(url.as_str(), e))
    }
}

#[async_trait]
impl ResultSource for HttpSource {
    fn describe(&self) -> String {
        self.root.to_string()
    }

    async fn list_suites(&self) -> Result<Vec<String>> {
        Ok(self.listing("").await?.directories)
    }

    async fn list_iterations(&self, suite: &str) -> Result<Vec<String>> {
        check_entry(suite)?;
        Ok(self.listing(&suite_dir(suite)).await?.files)
    }

    async fn load(&self, suite: &str, file: &str) -> Result<ResultFile> {
        check_entry(suite)?;
        check_entry(file)?;
        let url = self.url(&format!("{}{}", suite_dir(suite), file));
        let body = self.get(url, "result").await?;
        Ok(ResultFile::from_slice(file, &body)?)
    }
}

fn parse_root(root: &str) -> std::result::Result<Url, SourceConfigError> {
    let url = Url::parse(root).map_err(|e| SourceConfigError::InvalidUrl {
        root: root.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SourceConfigError::InvalidUrl {
            root: root.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }
    Ok(url)
}

fn suite_dir(suite: &str) -> String {
    if suite.ends_with('/') {
        suite.to_string()
    } else {
        format!("{suite}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    const ROOT_PAGE: &str = r#"<html><body><pre>
<a href="../">../</a>
<a href="min_hash/">min_hash/</a>
<a href="ssb/">ssb/</a>
</pre></body></html>"#;

    const SUITE_PAGE: &str = r#"<html><body><pre>
<a href="../">../</a>
<a href="run2.json">run2.json</a>
<a href="run1.json">run1.json</a>
<a href="broken.json">broken.json</a>
</pre></body></html>"#;

    const RUN1: &str = r#"{"benchmarks": [
        {"name": "MinHashSketchFixture/MultiwayIntersect16Tree/64", "real_time": 1200.0},
        {"name": "MinHashSketchFixture/MultiwayIntersect16Vector/64", "real_time": 900.0}
    ]}"#;

    async fn serve() -> String {
        let app = Router::new()
            .route("/benchmark_results/", get(|| async { ROOT_PAGE }))
            .route("/benchmark_results/min_hash/", get(|| async { SUITE_PAGE }))
            .route("/benchmark_results/min_hash/run1.json", get(|| async { RUN1 }))
            .route("/benchmark_results/min_hash/broken.json", get(|| async { "{}" }))
            .route(
                "/benchmark_results/down/",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route("/benchmark_results/json/", get(|| async { RUN1 }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/benchmark_results")
    }

    fn source(root: String) -> HttpSource {
        HttpSource::new(&root, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_root_gets_trailing_slash() {
        let root = Url::parse("http://host/results").unwrap();
        let source = HttpSource::with_client(reqwest::Client::new(), root);
        assert_eq!(source.root().as_str(), "http://host/results/");
        assert_eq!(source.url("").as_str(), "http://host/results/");
        assert_eq!(source.url("ssb/").as_str(), "http://host/results/ssb/");
        assert_eq!(source.url("ssb/q 1.json").as_str(), "http://host/results/ssb/q%201.json");
    }

    #[test]
    fn test_invalid_root_rejected() {
        for root in ["not a url", "mailto:someone@example.org"] {
            assert!(matches!(
                HttpSource::new(root, Duration::from_secs(1)),
                Err(SourceConfigError::InvalidUrl { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_escaping_names_not_requested() {
        // Nothing listens here; a request would fail as a fetch error.
        let source = source("http://127.0.0.1:9/benchmark_results".to_string());

        for suite in ["../private/", "/private/", "a/../../private/"] {
            let err = source.list_iterations(suite).await.unwrap_err();
            assert_eq!(err.code(), "INVALID_ENTRY");
        }
        let err = source.load("ssb/", "../creds.json").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_ENTRY");
    }

    #[tokio::test]
    async fn test_lists_suites_and_iterations() {
        let source = source(serve().await);

        assert_eq!(source.list_suites().await.unwrap(), vec!["min_hash/", "ssb/"]);
        assert_eq!(
            source.list_iterations("min_hash/").await.unwrap(),
            vec!["broken.json", "run1.json", "run2.json"]
        );
    }

    #[tokio::test]
    async fn test_loads_result_file() {
        let source = source(serve().await);

        let file = source.load("min_hash/", "run1.json").await.unwrap();
        assert_eq!(file.filename, "run1.json");
        assert_eq!(file.records.len(), 2);
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let source = source(serve().await);

        let missing = source.load("min_hash/", "run2.json").await.unwrap_err();
        assert_eq!(missing.code(), "FETCH_FAILED");
        assert!(missing.to_string().contains("404"));

        let broken = source.load("min_hash/", "broken.json").await.unwrap_err();
        assert_eq!(broken.code(), "PARSE_FAILED");

        let down = source.list_iterations("down/").await.unwrap_err();
        assert_eq!(down.code(), "FETCH_FAILED");

        let not_html = source.list_iterations("json/").await.unwrap_err();
        assert_eq!(not_html.code(), "PARSE_FAILED");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let source = source("http://127.0.0.1:9/benchmark_results".to_string());
        let err = source.list_suites().await.unwrap_err();
        assert_eq!(err.code(), "FETCH_FAILED");
    }
}
