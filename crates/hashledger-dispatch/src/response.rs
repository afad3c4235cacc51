//! Invocation responses.

use bytes::Bytes;

use crate::error::DispatchResult;

/// Outcome of one invocation: a payload, possibly empty, or one error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success { payload: Bytes },
    Error { message: String },
}

impl Response {
    /// Status code reported for successful invocations.
    pub const OK: u16 = 200;

    /// Status code reported for failed invocations.
    pub const ERROR: u16 = 500;

    /// A successful response with `payload`.
    pub fn success(payload: impl Into<Bytes>) -> Self {
        Response::Success { payload: payload.into() }
    }

    /// A failed response with `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error { message: message.into() }
    }

    pub fn status(&self) -> u16 {
        match self {
            Response::Success { .. } => Self::OK,
            Response::Error { .. } => Self::ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// The payload of a successful response.
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            Response::Success { payload } => Some(payload),
            Response::Error { .. } => None,
        }
    }

    /// The message of a failed response.
    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Success { .. } => None,
            Response::Error { message } => Some(message),
        }
    }
}

impl From<DispatchResult<Bytes>> for Response {
    fn from(result: DispatchResult<Bytes>) -> Self {
        match result {
            Ok(payload) => Response::Success { payload },
            Err(err) => Response::Error { message: err.to_string() },
        }
    }
}
