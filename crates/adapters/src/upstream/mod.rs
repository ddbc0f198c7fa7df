// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result sources backed by real storage.
//!
//! - **HTTP**: a static file server with directory autoindex pages
//! - **Filesystem**: a local results directory
//! - **Autoindex**: the HTML listing parser used by the HTTP source
//! - **Config**: picks and builds a source from a results root
//!
//! # Example
//!
//! ```no_run
//! use benchscope_adapters::upstream::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceConfig::for_root("./benchmark_results").build()?;
//! let suites = source.list_suites().await?;
//! # Ok(())
//! # }
//! ```

pub mod autoindex;
pub mod config;
pub mod filesystem;
pub mod http;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::autoindex::{parse_listing, AutoindexError};
    pub use super::config::{SourceConfig, SourceConfigError, SourceKind};
    pub use super::filesystem::FsSource;
    pub use super::http::HttpSource;
    pub use benchscope_core::ResultSource;
}

pub use config::SourceConfig;
pub use filesystem::FsSource;
pub use http::HttpSource;
