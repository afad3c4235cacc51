//! Configuration validation

use thiserror::Error;

use crate::{Config, StorageConfig};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0} (must be one of: trace, debug, info, warn, error)")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0} (must be one of: pretty, compact, json)")]
    InvalidLogFormat(String),

    #[error("Invalid backend: {0} (must be one of: memory)")]
    InvalidBackend(String),

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Validate complete configuration
pub fn validate(config: &Config) -> Result<()> {
    let mut errors = Vec::new();

    if let Err(e) = validate_logging(&config.logging) {
        errors.push(e);
    }

    if let Err(e) = validate_log_format(&config.log_format) {
        errors.push(e);
    }

    if let Err(e) = validate_storage(&config.storage) {
        errors.push(e);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate logging level
pub fn validate_logging(level: &str) -> Result<()> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::InvalidLogLevel(level.to_string())),
    }
}

/// Validate log output format
pub fn validate_log_format(format: &str) -> Result<()> {
    match format.to_lowercase().as_str() {
        "pretty" | "compact" | "json" => Ok(()),
        _ => Err(ValidationError::InvalidLogFormat(format.to_string())),
    }
}

/// Validate storage configuration
pub fn validate_storage(config: &StorageConfig) -> Result<()> {
    match config.backend.as_str() {
        "memory" => Ok(()),
        _ => Err(ValidationError::InvalidBackend(config.backend.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_logging_levels() {
        for level in &["trace", "debug", "info", "warn", "error", "INFO"] {
            assert!(validate_logging(level).is_ok());
        }
        assert!(matches!(validate_logging("verbose"), Err(ValidationError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_validate_log_format() {
        assert!(validate_log_format("json").is_ok());
        assert!(matches!(validate_log_format("xml"), Err(ValidationError::InvalidLogFormat(_))));
    }

    #[test]
    fn test_validate_storage_backend() {
        let config = StorageConfig { backend: "foundationdb".to_string(), atomic_batches: true };
        assert!(matches!(validate_storage(&config), Err(ValidationError::InvalidBackend(_))));
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let config = Config { logging: "loud".to_string(), ..Config::default() };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_multiple_errors_are_collected() {
        let config = Config {
            logging: "loud".to_string(),
            log_format: "xml".to_string(),
            storage: StorageConfig { backend: "disk".to_string(), atomic_batches: false },
        };

        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }
}
