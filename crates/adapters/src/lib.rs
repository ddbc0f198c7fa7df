// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Storage adapters for benchscope.
//!
//! Implementations of [`benchscope_core::ResultSource`] over an HTTP file
//! server and a local directory, plus the configuration that chooses between
//! them.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod upstream;

pub use upstream::{FsSource, HttpSource, SourceConfig};
