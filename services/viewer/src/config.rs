// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Viewer configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `benchscope.toml` in the working directory, then `BENCHSCOPE__*`
//! environment variables (`BENCHSCOPE__SOURCE__ROOT`,
//! `BENCHSCOPE__LOG__FORMAT`, ...).

use benchscope_adapters::upstream::config::{SourceConfig, SourceConfigError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The bind address is empty
    #[error("bind_addr must not be empty")]
    EmptyBindAddr,

    /// The source settings are invalid
    #[error(transparent)]
    Source(#[from] SourceConfigError),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable lines
    #[default]
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
}

/// Settings of the viewer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Where results are read from.
    pub source: SourceConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            source: SourceConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from `benchscope.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("benchscope")
    }

    /// Load with `file` (extension optional) as the file layer.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("BENCHSCOPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check the loaded settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::EmptyBindAddr);
        }
        self.source.validate()?;
        Ok(())
    }
}
