//! # Hashledger Config - Configuration Management
//!
//! Handles configuration loading from files and environment variables.
//!
//! ## Configuration Format
//!
//! Settings live under a `ledger:` section so the file can be shared with
//! other services:
//!
//! ```yaml
//! ledger:
//!   logging: "info"
//!   log_format: "compact"
//!   storage:
//!     backend: "memory"
//!     atomic_batches: true
//! ```
//!
//! ## Precedence
//!
//! 1. Serde defaults
//! 2. The configuration file, if it exists
//! 3. `HASHLEDGER__LEDGER__*` environment variables, e.g.
//!    `HASHLEDGER__LEDGER__STORAGE__ATOMIC_BATCHES=false`

pub mod validation;

use std::path::Path;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub use validation::ValidationError;

/// Root configuration wrapper.
///
/// Only the `ledger` section is read; other sections are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RootConfig {
    /// Ledger configuration
    #[serde(default)]
    pub ledger: Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_logging")]
    pub logging: String,

    /// Log output format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: default_logging(),
            log_format: default_log_format(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate every section, collecting all errors.
    pub fn validate(&self) -> validation::Result<()> {
        validation::validate(self)
    }
}

fn default_logging() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backing store. Only `memory` is built in.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Commit multi-key writes atomically when the backend supports it.
    ///
    /// When false, hash uploads use ordered single-key writes.
    #[serde(default = "default_atomic_batches")]
    pub atomic_batches: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: default_backend(), atomic_batches: default_atomic_batches() }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_atomic_batches() -> bool {
    true
}

/// Load configuration from a file, with environment overrides.
///
/// A missing file is not an error; defaults and environment variables apply.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let builder = ConfigBuilder::builder().add_source(File::from(path.as_ref()).required(false));

    let builder = builder
        .add_source(Environment::with_prefix("HASHLEDGER").separator("__").try_parsing(true));

    let root: RootConfig = builder.build()?.try_deserialize()?;
    Ok(root.ledger)
}

/// Load configuration with defaults
///
/// Logs a warning and falls back to defaults if the file cannot be read.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
    match load(path.as_ref()) {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully from {:?}", path.as_ref());
            config
        },
        Err(e) => {
            tracing::warn!(
                "Failed to load config from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Config::default()
        },
    }
}
