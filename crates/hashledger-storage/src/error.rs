//! Storage error types.

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors reported by a [`StorageBackend`](crate::StorageBackend).
///
/// Backends map their internal failures onto these variants. None of them is
/// retried by the record layer; `Conflict` is the one callers are expected to
/// retry themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The store rejected a write because of a concurrent modification.
    #[error("Conflict: concurrent modification detected")]
    Conflict,

    /// The store could not be reached or refused the request.
    #[error("Storage connection error: {message}")]
    Connection {
        /// Backend-specific description.
        message: String,
    },

    /// The operation did not complete in time.
    #[error("Operation timed out")]
    Timeout,

    /// Unexpected failure inside the backend.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Backend-specific description.
        message: String,
    },
}

impl StorageError {
    /// Creates a [`StorageError::Conflict`].
    pub fn conflict() -> Self {
        StorageError::Conflict
    }

    /// Creates a [`StorageError::Connection`] with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        StorageError::Connection { message: message.into() }
    }

    /// Creates a [`StorageError::Timeout`].
    pub fn timeout() -> Self {
        StorageError::Timeout
    }

    /// Creates a [`StorageError::Internal`] with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        StorageError::Internal { message: message.into() }
    }
}
