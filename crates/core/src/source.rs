// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Where results come from.
//!
//! A [`ResultSource`] lists the suite directories under a results root, lists
//! the iteration files of one suite, and loads one iteration file. Listings
//! are reduced to [`Listing`]s with the same rules whatever the backend.

use crate::error::{Error, Result};
use async_trait::async_trait;
use benchscope_benchmarks::ResultFile;
use futures::stream::{self, StreamExt, TryStreamExt};

/// Directory listing and result loading.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Human-readable root, for logs and page headers.
    fn describe(&self) -> String;

    /// Suite directories under the root, sorted, each ending in `/`.
    async fn list_suites(&self) -> Result<Vec<String>>;

    /// Iteration files (`*.json`) of one suite, sorted.
    async fn list_iterations(&self, suite: &str) -> Result<Vec<String>>;

    /// Load and decode one iteration file.
    async fn load(&self, suite: &str, file: &str) -> Result<ResultFile>;
}

/// Entries of one directory, split by kind and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Subdirectories, each ending in `/`.
    pub directories: Vec<String>,
    /// Result files, each ending in `.json`.
    pub files: Vec<String>,
}

impl Listing {
    /// Classify raw entry names.
    ///
    /// Directories end in `/`, files end in `.json`, and both must be plain
    /// relative names (see [`is_plain_entry`]). Everything else is dropped.
    /// Both lists are sorted ascending and deduplicated.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut listing = Listing::default();
        for entry in entries {
            let entry = entry.as_ref();
            let entry = entry.strip_prefix("./").unwrap_or(entry);
            if !is_plain_entry(entry) {
                continue;
            }
            if entry.ends_with('/') {
                listing.directories.push(entry.to_string());
            } else if entry.ends_with(".json") {
                listing.files.push(entry.to_string());
            }
        }

        listing.directories.sort();
        listing.directories.dedup();
        listing.files.sort();
        listing.files.dedup();
        listing
    }
}

/// Whether `name` is a plain relative entry under the results root.
///
/// Empty and absolute names, `.` and `..` segments, empty segments,
/// backslashes and URL syntax are all rejected. A single trailing `/` marks
/// a directory and is allowed.
pub fn is_plain_entry(name: &str) -> bool {
    let trimmed = name.strip_suffix('/').unwrap_or(name);
    !trimmed.is_empty()
        && !trimmed.starts_with('/')
        && !trimmed.contains(['\\', '?', '#', ':'])
        && trimmed
            .split('/')
            .all(|segment| !matches!(segment, "" | "." | ".."))
}

/// Reject a suite or file name that would leave the results root.
pub fn check_entry(name: &str) -> Result<()> {
    if is_plain_entry(name) {
        Ok(())
    } else {
        Err(Error::InvalidEntry {
            name: name.to_string(),
        })
    }
}

/// Load `files` of `suite`, up to `concurrency` at a time.
///
/// The result keeps the order of `files` whatever order the loads complete
/// in; the first failure aborts the whole batch.
pub async fn load_all(
    source: &dyn ResultSource,
    suite: &str,
    files: &[String],
    concurrency: usize,
) -> Result<Vec<ResultFile>> {
    let loads: Vec<_> = files.iter().map(|file| source.load(suite, file)).collect();
    stream::iter(loads)
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_listing_split_and_sorted() {
        let listing = Listing::from_entries([
            "run2.json",
            "../",
            "b/",
            "a/",
            "run1.json",
            "notes.txt",
        ]);
        assert_eq!(listing.directories, vec!["a/", "b/"]);
        assert_eq!(listing.files, vec!["run1.json", "run2.json"]);
    }

    #[test]
    fn test_listing_ignores_navigation_entries() {
        let listing = Listing::from_entries([
            "./",
            "/",
            "/icons/",
            "",
            "./ssb/",
            "ssb/",
            "?C=N;O=D",
            "../../etc/",
        ]);
        assert_eq!(listing.directories, vec!["ssb/"]);
        assert!(listing.files.is_empty());
    }

    #[test]
    fn test_listing_drops_escaping_files() {
        let listing = Listing::from_entries([
            "../x.json",
            "sub/../x.json",
            "./run1.json",
            "/abs/run2.json",
            "dir\\run3.json",
            "http://elsewhere/run4.json",
        ]);
        assert_eq!(listing.files, vec!["run1.json"]);
    }

    #[test]
    fn test_check_entry() {
        for name in ["ssb/", "ssb", "nested/ssb/", "run1.json", "ssb_240305_abc123.json"] {
            assert!(check_entry(name).is_ok(), "{name}");
        }
        for name in ["", "/", "../", "../private/", "/tmp/private/", "a/./b/", "a//b/", ".", "c:/x/"] {
            let err = check_entry(name).unwrap_err();
            assert_eq!(err.code(), "INVALID_ENTRY", "{name}");
        }
    }

    #[tokio::test]
    async fn test_load_all_keeps_file_order() {
        let mut source = MockResultSource::new();
        source
            .expect_load()
            .times(3)
            .returning(|_, file| Ok(ResultFile::new(file, Vec::new())));

        let files = vec![
            "run1.json".to_string(),
            "run2.json".to_string(),
            "run3.json".to_string(),
        ];
        let loaded = load_all(&source, "ssb/", &files, 3).await.unwrap();
        let names: Vec<_> = loaded.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["run1.json", "run2.json", "run3.json"]);
    }

    #[tokio::test]
    async fn test_load_all_propagates_first_error() {
        let mut source = MockResultSource::new();
        source.expect_load().returning(|_, file| {
            if file == "run2.json" {
                Err(Error::fetch(file, "status 500"))
            } else {
                Ok(ResultFile::new(file, Vec::new()))
            }
        });

        let files = vec!["run1.json".to_string(), "run2.json".to_string()];
        let err = load_all(&source, "ssb/", &files, 1).await.unwrap_err();
        assert_eq!(err.code(), "FETCH_FAILED");
    }
}
