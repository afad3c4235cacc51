//! Repository error types for hashledger storage operations.
//!
//! This module provides a [`RepositoryError`] enum that wraps storage-level errors
//! and adds domain-specific error variants for repository operations.

use hashledger_storage::StorageError;

/// Result type alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The requested record was not found.
    ///
    /// Only used inside the repositories; point queries report absence as
    /// `Ok(None)`.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record with the same primary key already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// An identifier contains the key delimiter.
    #[error("Invalid identifier: {field} {value:?} must not contain '#'")]
    InvalidIdentifier {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A key range was requested without the outer identifier its namespace
    /// needs, or with one it does not take.
    #[error("Invalid range over {namespace}: {reason}")]
    InvalidRange {
        /// Key prefix of the namespace.
        namespace: &'static str,
        /// What was wrong with the request.
        reason: &'static str,
    },

    /// The store rejected a write because of a concurrent modification.
    ///
    /// The operation should typically be retried.
    #[error("Conflict: concurrent modification detected")]
    Conflict,

    /// A stored record could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A record could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The underlying store failed a get, put, delete or scan.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A compound write stored one key but not the other.
    ///
    /// Repeating the create repairs the record.
    #[error("Partial write: {written} was stored but {missing} was not: {reason}")]
    PartialWrite {
        /// Key that was written.
        written: String,
        /// Key that is missing.
        missing: String,
        /// Store failure that interrupted the write.
        reason: String,
    },
}

impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict => RepositoryError::Conflict,
            StorageError::Connection { message } => RepositoryError::StoreUnavailable(message),
            StorageError::Timeout => {
                RepositoryError::StoreUnavailable("operation timed out".to_string())
            },
            StorageError::Internal { message } => RepositoryError::StoreUnavailable(message),
        }
    }
}
