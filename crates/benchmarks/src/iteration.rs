// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Iteration file names.
//!
//! Result files follow the contract `<prefix>_<YYMMDD>_<commithash>.json`.
//! The prefix may contain underscores of its own; the date and commit are
//! always the last two underscore-delimited tokens before the extension.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static ITERATION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>.+)_(?P<date>\d{6})_(?P<commit>[0-9A-Za-z]+)\.json$")
        .expect("iteration name pattern is valid")
});

/// A parsed `<prefix>_<YYMMDD>_<commithash>.json` file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationName {
    /// Leading free-form part, usually the suite or binary name.
    pub prefix: String,
    /// Date the iteration was recorded.
    pub date: NaiveDate,
    /// Abbreviated commit hash of the measured revision.
    pub commit: String,
}

impl IterationName {
    /// Parse a file name; `None` when it does not follow the contract or the
    /// date is not a calendar date.
    pub fn parse(filename: &str) -> Option<Self> {
        let captures = ITERATION_NAME.captures(filename)?;
        let date = NaiveDate::parse_from_str(&captures["date"], "%y%m%d").ok()?;
        Some(Self {
            prefix: captures["prefix"].to_string(),
            date,
            commit: captures["commit"].to_string(),
        })
    }

    /// Label used on chart axes, e.g. `05.3.24 [abc123]`.
    pub fn display_label(&self) -> String {
        self.to_string()
    }

    /// The display label of `filename`, or the file name itself when it does
    /// not follow the contract.
    pub fn display_label_for(filename: &str) -> String {
        match Self::parse(filename) {
            Some(name) => name.display_label(),
            None => {
                tracing::debug!(filename, "File name does not follow <prefix>_<YYMMDD>_<commit>.json");
                filename.to_string()
            }
        }
    }
}

impl fmt::Display for IterationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{}.{:02} [{}]",
            self.date.day(),
            self.date.month(),
            self.date.year() % 100,
            self.commit
        )
    }
}
