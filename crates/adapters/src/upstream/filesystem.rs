// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Results in a local directory tree.
//!
//! Same layout as the HTTP source: one subdirectory per suite, one JSON file
//! per iteration. Handy for browsing a checkout of the results repository
//! without a file server.

use async_trait::async_trait;
use benchscope_benchmarks::io::{read_result_file, ReadResultError};
use benchscope_benchmarks::ResultFile;
use benchscope_core::{check_entry, Error, Listing, Result, ResultSource};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A [`ResultSource`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The results root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn listing(&self, dir: PathBuf) -> Result<Listing> {
        let location = dir.display().to_string();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| count("listing", Error::fetch(&location, e)))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| count("listing", Error::fetch(&location, e)))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            names.push(if is_dir { format!("{name}/") } else { name });
        }

        metrics::counter!("benchscope_fetch_total", "kind" => "listing", "outcome" => "ok")
            .increment(1);
        debug!(dir = %location, entries = names.len(), "Listed directory");
        Ok(Listing::from_entries(names))
    }
}

fn count(kind: &'static str, err: Error) -> Error {
    metrics::counter!("benchscope_fetch_total", "kind" => kind, "outcome" => "error").increment(1);
    err
}

#[async_trait]
impl ResultSource for FsSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_suites(&self) -> Result<Vec<String>> {
        Ok(self.listing(self.root.clone()).await?.directories)
    }

    async fn list_iterations(&self, suite: &str) -> Result<Vec<String>> {
        check_entry(suite)?;
        Ok(self.listing(self.root.join(suite)).await?.files)
    }

    async fn load(&self, suite: &str, file: &str) -> Result<ResultFile> {
        check_entry(suite)?;
        check_entry(file)?;
        let path = self.root.join(suite).join(file);
        let location = path.display().to_string();

        let loaded = tokio::task::spawn_blocking(move || read_result_file(path))
            .await
            .map_err(|e| count("result", Error::fetch(&location, e)))?;

        match loaded {
            Ok(file) => {
                metrics::counter!("benchscope_fetch_total", "kind" => "result", "outcome" => "ok")
                    .increment(1);
                Ok(file)
            }
            Err(ReadResultError::Io { source, .. }) => Err(count("result", Error::fetch(location, source))),
            Err(ReadResultError::Decode(err)) => Err(count("result", err.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("benchscope-fs-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("min_hash")).unwrap();
        fs::create_dir_all(dir.join("ssb")).unwrap();
        fs::write(
            dir.join("min_hash").join("run2.json"),
            r#"{"benchmarks": [{"name": "F/B/1", "real_time": 3.0}]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("min_hash").join("run1.json"),
            r#"{"benchmarks": [{"name": "F/B/1", "real_time": 2.0}]}"#,
        )
        .unwrap();
        fs::write(dir.join("min_hash").join("notes.txt"), "n/a").unwrap();
        fs::write(dir.join("min_hash").join("bad.json"), "not json").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_lists_directories_with_trailing_slash() {
        let root = scratch();
        let source = FsSource::new(&root);

        assert_eq!(source.list_suites().await.unwrap(), vec!["min_hash/", "ssb/"]);
        assert_eq!(
            source.list_iterations("min_hash/").await.unwrap(),
            vec!["bad.json", "run1.json", "run2.json"]
        );
        assert!(source.list_iterations("ssb/").await.unwrap().is_empty());

        fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_load_and_errors() {
        let root = scratch();
        let source = FsSource::new(&root);

        let file = source.load("min_hash/", "run1.json").await.unwrap();
        assert_eq!(file.filename, "run1.json");
        assert_eq!(file.records[0].real_time, 2.0);

        let missing = source.load("min_hash/", "run9.json").await.unwrap_err();
        assert_eq!(missing.code(), "FETCH_FAILED");

        let bad = source.load("min_hash/", "bad.json").await.unwrap_err();
        assert_eq!(bad.code(), "PARSE_FAILED");

        let no_suite = source.list_iterations("nope/").await.unwrap_err();
        assert_eq!(no_suite.code(), "FETCH_FAILED");

        fs::remove_dir_all(root).ok();
    }

    #[tokio::test]
    async fn test_names_outside_root_rejected() {
        let base = std::env::temp_dir().join(format!("benchscope-fs-{}", uuid::Uuid::new_v4()));
        let root = base.join("benchmark_results");
        fs::create_dir_all(root.join("ssb")).unwrap();
        fs::create_dir_all(base.join("private")).unwrap();
        fs::write(
            base.join("private").join("creds.json"),
            r#"{"benchmarks": [{"name": "leak", "real_time": 1.0}]}"#,
        )
        .unwrap();
        let source = FsSource::new(&root);

        let absolute = format!("{}/", base.join("private").display());
        for suite in [absolute.as_str(), "../private/", "ssb/../../private/"] {
            let err = source.list_iterations(suite).await.unwrap_err();
            assert_eq!(err.code(), "INVALID_ENTRY", "{suite}");
            let err = source.load(suite, "creds.json").await.unwrap_err();
            assert_eq!(err.code(), "INVALID_ENTRY", "{suite}");
        }
        let err = source.load("ssb/", "../../private/creds.json").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_ENTRY");

        fs::remove_dir_all(base).ok();
    }
}
