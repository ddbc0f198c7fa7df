// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the benchscope pipeline.

use crate::shaper::ShapeError;
use benchscope_benchmarks::ResultFileError;
use thiserror::Error;

/// Errors that can occur while listing, loading or shaping results.
#[derive(Debug, Error)]
pub enum Error {
    /// The listing or result file could not be retrieved
    #[error("failed to fetch {location}: {reason}")]
    Fetch {
        /// URL or path that was requested
        location: String,
        /// Transport, status or I/O failure
        reason: String,
    },

    /// The listing or result file was retrieved but does not parse
    #[error("failed to parse {location}: {reason}")]
    Parse {
        /// URL or path whose body was rejected
        location: String,
        /// Decoder message
        reason: String,
    },

    /// The records do not fit the suite's chart layout
    #[error("cannot chart results: {0}")]
    Shape(#[from] ShapeError),

    /// The requested iteration is not part of the suite's listing
    #[error("unknown iteration '{iteration}' in suite '{suite}'")]
    UnknownIteration {
        /// Selected suite
        suite: String,
        /// Requested file
        iteration: String,
    },

    /// An iteration was selected before any suite
    #[error("no benchmark suite selected")]
    NoSuiteSelected,

    /// An iteration was selected while the suite's listing is still loading
    #[error("iterations of suite '{suite}' are still loading")]
    ListingPending {
        /// Suite being listed
        suite: String,
    },

    /// A suite or file name that would leave the results root
    #[error("invalid entry name '{name}'")]
    InvalidEntry {
        /// Rejected name
        name: String,
    },
}

impl Error {
    /// Build a fetch error.
    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a parse error.
    pub fn parse(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable code, used in API error bodies and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "FETCH_FAILED",
            Self::Parse { .. } => "PARSE_FAILED",
            Self::Shape(_) => "SHAPE_FAILED",
            Self::UnknownIteration { .. } => "UNKNOWN_ITERATION",
            Self::NoSuiteSelected => "NO_SUITE_SELECTED",
            Self::ListingPending { .. } => "LISTING_PENDING",
            Self::InvalidEntry { .. } => "INVALID_ENTRY",
        }
    }
}

impl From<ResultFileError> for Error {
    fn from(err: ResultFileError) -> Self {
        let location = match &err {
            ResultFileError::InvalidJson { filename, .. }
            | ResultFileError::MissingBenchmarks { filename }
            | ResultFileError::InvalidRecord { filename, .. } => filename.clone(),
        };
        Self::parse(location, err)
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
