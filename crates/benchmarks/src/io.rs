// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for result files and chart exports.
//!
//! This module reads result files from the filesystem and writes shaped
//! charts back out as JSON or Markdown.

use crate::chart::ChartSpec;
use crate::markdown;
use crate::result::{ResultFile, ResultFileError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a result file from disk.
#[derive(Debug, Error)]
pub enum ReadResultError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but does not decode
    #[error(transparent)]
    Decode(#[from] ResultFileError),
}

/// Read and decode one result file. The record file name is the last path
/// component.
pub fn read_result_file(path: impl AsRef<Path>) -> Result<ResultFile, ReadResultError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ReadResultError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ResultFile::from_slice(filename, &bytes)?)
}

/// Write chart specs to a pretty-printed JSON file.
pub fn write_charts_json(charts: &[ChartSpec], path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(charts)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Write chart specs as Markdown tables.
pub fn write_charts_markdown(charts: &[ChartSpec], path: impl AsRef<Path>) -> io::Result<()> {
    fs::write(path, markdown::render_charts(charts))
}
