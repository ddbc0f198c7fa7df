// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Source selection.
//!
//! A results root starting with `http://` or `https://` is served by
//! [`HttpSource`]; anything else is a local directory read by [`FsSource`].
//!
//! # Example
//!
//! ```no_run
//! use benchscope_adapters::upstream::config::SourceConfig;
//!
//! let config = SourceConfig {
//!     root: "http://localhost:8000/benchmark_results/".to_string(),
//!     ..Default::default()
//! };
//! let source = config.build().unwrap();
//! println!("reading from {}", source.describe());
//! ```

use super::filesystem::FsSource;
use super::http::HttpSource;
use benchscope_core::{RenderOptions, ResultSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building a source from configuration.
#[derive(Debug, Error)]
pub enum SourceConfigError {
    /// No results root configured
    #[error("results root must not be empty")]
    EmptyRoot,

    /// The root looks like a URL but does not parse as one
    #[error("invalid results root URL '{root}': {reason}")]
    InvalidUrl {
        /// Configured root
        root: String,
        /// Parser message
        reason: String,
    },

    /// Zero request timeout
    #[error("source timeout must be at least one second")]
    InvalidTimeout,

    /// Zero load concurrency
    #[error("source concurrency must be at least 1")]
    InvalidConcurrency,

    /// The HTTP client could not be created
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for source configuration.
pub type Result<T> = std::result::Result<T, SourceConfigError>;

/// Which backend a root selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Static file server with autoindex pages
    Http,
    /// Local directory
    Filesystem,
}

/// Where results are read from and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Results root, a URL or a directory.
    pub root: String,
    /// Per-request timeout of the HTTP source.
    pub timeout_secs: u64,
    /// Iteration files loaded at once for the combined view.
    pub concurrency: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: "benchmark_results".to_string(),
            timeout_secs: 10,
            concurrency: 1,
        }
    }
}

impl SourceConfig {
    /// Config for `root` with default timeout and concurrency.
    pub fn for_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// The backend the root selects.
    pub fn kind(&self) -> SourceKind {
        if self.root.starts_with("http://") || self.root.starts_with("https://") {
            SourceKind::Http
        } else {
            SourceKind::Filesystem
        }
    }

    /// Check the settings without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.root.trim().is_empty() {
            return Err(SourceConfigError::EmptyRoot);
        }
        if self.timeout_secs == 0 {
            return Err(SourceConfigError::InvalidTimeout);
        }
        if self.concurrency == 0 {
            return Err(SourceConfigError::InvalidConcurrency);
        }
        Ok(())
    }

    /// Build the configured source.
    pub fn build(&self) -> Result<Arc<dyn ResultSource>> {
        self.validate()?;

        let source: Arc<dyn ResultSource> = match self.kind() {
            SourceKind::Http => Arc::new(HttpSource::new(
                &self.root,
                Duration::from_secs(self.timeout_secs),
            )?),
            SourceKind::Filesystem => Arc::new(FsSource::new(&self.root)),
        };

        tracing::info!(
            root = %self.root,
            kind = ?self.kind(),
            concurrency = self.concurrency,
            "Configured result source"
        );
        Ok(source)
    }

    /// Render options matching these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            concurrency: self.concurrency,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_root() {
        assert_eq!(SourceConfig::for_root("http://host/r/").kind(), SourceKind::Http);
        assert_eq!(SourceConfig::for_root("https://host/r/").kind(), SourceKind::Http);
        assert_eq!(SourceConfig::for_root("./benchmark_results").kind(), SourceKind::Filesystem);
        assert_eq!(SourceConfig::for_root("httpdocs/results").kind(), SourceKind::Filesystem);
    }

    #[test]
    fn test_validation() {
        assert!(SourceConfig::default().validate().is_ok());
        assert!(matches!(
            SourceConfig::for_root("  ").validate(),
            Err(SourceConfigError::EmptyRoot)
        ));

        let config = SourceConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SourceConfigError::InvalidConcurrency)));

        let config = SourceConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SourceConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_build_describes_root() {
        let source = SourceConfig::for_root("http://host/benchmark_results").build().unwrap();
        assert_eq!(source.describe(), "http://host/benchmark_results/");

        let source = SourceConfig::for_root("results").build().unwrap();
        assert_eq!(source.describe(), "results");
    }

    #[test]
    fn test_build_rejects_malformed_url() {
        let err = SourceConfig::for_root("http://exa mple/results").build().err().unwrap();
        assert!(matches!(err, SourceConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_render_options_carry_concurrency() {
        let config = SourceConfig {
            concurrency: 4,
            ..Default::default()
        };
        assert_eq!(config.render_options().concurrency, 4);
        assert!(config.render_options().aggregate.is_none());
    }
}
