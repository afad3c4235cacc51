//! Dispatch error types.

use hashledger_repository::RepositoryError;

use crate::operation::Operation;

/// Result type alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors reported by the dispatch layer.
///
/// The `Display` text of each variant is the message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The operation name is not one of the supported operations.
    #[error("Invalid invoke function name: {0}")]
    UnknownOperation(String),

    /// The operation requires an argument that was not supplied.
    #[error("Decode error: {operation} requires a {expected} argument")]
    MissingArgument {
        /// Operation that was invoked.
        operation: Operation,
        /// Description of the missing argument.
        expected: &'static str,
    },

    /// An argument could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A result could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The repository rejected or failed the operation.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DispatchError::UnknownOperation("drop_all".to_string());
        assert_eq!(err.to_string(), "Invalid invoke function name: drop_all");

        let err =
            DispatchError::MissingArgument { operation: Operation::QueryHash, expected: "hash id" };
        assert_eq!(err.to_string(), "Decode error: query_hash requires a hash id argument");

        let err: DispatchError =
            RepositoryError::AlreadyExists("Hash x already exists".into()).into();
        assert_eq!(err.to_string(), "Already exists: Hash x already exists");
    }
}
