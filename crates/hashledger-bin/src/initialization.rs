//! Startup: configuration loading and backend construction.

use std::path::Path;

use hashledger_config::{Config, StorageConfig};
use hashledger_dispatch::Dispatcher;
use hashledger_storage::MemoryBackend;

/// Configuration read at startup, before logging is initialized.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// Load error that caused the defaults to be used, if any.
    pub fallback: Option<String>,
}

impl LoadedConfig {
    /// Reports a fallback to defaults. Call once logging is initialized.
    pub fn report_fallback(&self, path: &Path) {
        if let Some(reason) = &self.fallback {
            tracing::warn!(
                path = %path.display(),
                error = %reason,
                "Failed to load config. Using defaults."
            );
        }
    }
}

/// Load configuration, falling back to defaults on error.
///
/// Nothing is logged here; the error is kept in [`LoadedConfig::fallback`]
/// so it survives until a subscriber is installed.
pub fn load_config(path: impl AsRef<Path>) -> LoadedConfig {
    match hashledger_config::load(path) {
        Ok(config) => LoadedConfig { config, fallback: None },
        Err(e) => LoadedConfig { config: Config::default(), fallback: Some(e.to_string()) },
    }
}

/// Build the configured storage backend.
///
/// Expects a validated configuration; `memory` is the only backend.
pub fn build_backend(config: &StorageConfig) -> MemoryBackend {
    if config.atomic_batches {
        tracing::info!(backend = %config.backend, "Using in-memory storage backend");
        MemoryBackend::new()
    } else {
        tracing::warn!(
            backend = %config.backend,
            "Atomic batches disabled; hash uploads use ordered single-key writes"
        );
        MemoryBackend::without_transactions()
    }
}

/// Build a dispatcher over the configured backend.
pub fn build_dispatcher(config: &StorageConfig) -> Dispatcher<MemoryBackend> {
    Dispatcher::builder().backend(build_backend(config)).build()
}
