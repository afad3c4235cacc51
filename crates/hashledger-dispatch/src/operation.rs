//! The closed set of operations and their typed requests.
//!
//! Raw invocations (an operation name plus positional byte arguments) are
//! turned into a [`Request`] here, before any repository is touched. Record
//! arguments are JSON; identifier arguments are taken verbatim as UTF-8.

use std::{fmt, str::FromStr};

use hashledger_types::{HashRecord, SettingRecord, TemplateRecord};
use serde::de::DeserializeOwned;

use crate::error::{DispatchError, DispatchResult};

/// Every supported operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UploadHash,
    QueryHash,
    QueryUserHash,
    UploadSetting,
    QuerySetting,
    QueryAllSetting,
    UploadTemp,
    UploadSelectedTemp,
    UpdateTemp,
    DeleteTemp,
    QueryTemp,
    QuerySelectedTemp,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 12] = [
        Operation::UploadHash,
        Operation::QueryHash,
        Operation::QueryUserHash,
        Operation::UploadSetting,
        Operation::QuerySetting,
        Operation::QueryAllSetting,
        Operation::UploadTemp,
        Operation::UploadSelectedTemp,
        Operation::UpdateTemp,
        Operation::DeleteTemp,
        Operation::QueryTemp,
        Operation::QuerySelectedTemp,
    ];

    /// The wire name of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::UploadHash => "upload_hash",
            Operation::QueryHash => "query_hash",
            Operation::QueryUserHash => "query_user_hash",
            Operation::UploadSetting => "upload_setting",
            Operation::QuerySetting => "query_setting",
            Operation::QueryAllSetting => "query_all_setting",
            Operation::UploadTemp => "upload_temp",
            Operation::UploadSelectedTemp => "upload_selected_temp",
            Operation::UpdateTemp => "update_temp",
            Operation::DeleteTemp => "delete_temp",
            Operation::QueryTemp => "query_temp",
            Operation::QuerySelectedTemp => "query_selected_temp",
        }
    }

    /// Whether the operation modifies stored state.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Operation::UploadHash
                | Operation::UploadSetting
                | Operation::UploadTemp
                | Operation::UploadSelectedTemp
                | Operation::UpdateTemp
                | Operation::DeleteTemp
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownOperation(s.to_string()))
    }
}

/// A decoded invocation, carrying the argument its operation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    UploadHash(HashRecord),
    QueryHash { hash: String },
    QueryUserHash { owner: String },
    UploadSetting(SettingRecord),
    QuerySetting { name: String },
    QueryAllSetting,
    UploadTemp(TemplateRecord),
    UploadSelectedTemp(TemplateRecord),
    UpdateTemp(TemplateRecord),
    DeleteTemp { name: String },
    QueryTemp,
    QuerySelectedTemp,
}

impl Request {
    /// Decode a raw invocation.
    ///
    /// Only the first argument is read; extra arguments are ignored.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperation` for an unsupported name, `MissingArgument`
    /// when a required argument is absent and `Decode` when it is malformed.
    pub fn parse<A: AsRef<[u8]>>(function: &str, args: &[A]) -> DispatchResult<Self> {
        let operation: Operation = function.parse()?;
        let first = args.first().map(AsRef::as_ref);

        let request = match operation {
            Operation::UploadHash => Request::UploadHash(record(operation, first)?),
            Operation::QueryHash => {
                Request::QueryHash { hash: identifier(operation, "hash id", first)? }
            },
            Operation::QueryUserHash => {
                Request::QueryUserHash { owner: identifier(operation, "owner name", first)? }
            },
            Operation::UploadSetting => Request::UploadSetting(record(operation, first)?),
            Operation::QuerySetting => {
                Request::QuerySetting { name: identifier(operation, "setting name", first)? }
            },
            Operation::QueryAllSetting => Request::QueryAllSetting,
            Operation::UploadTemp => Request::UploadTemp(record(operation, first)?),
            Operation::UploadSelectedTemp => Request::UploadSelectedTemp(record(operation, first)?),
            Operation::UpdateTemp => Request::UpdateTemp(record(operation, first)?),
            Operation::DeleteTemp => {
                Request::DeleteTemp { name: identifier(operation, "template name", first)? }
            },
            Operation::QueryTemp => Request::QueryTemp,
            Operation::QuerySelectedTemp => Request::QuerySelectedTemp,
        };
        Ok(request)
    }

    /// The operation this request invokes.
    pub fn operation(&self) -> Operation {
        match self {
            Request::UploadHash(_) => Operation::UploadHash,
            Request::QueryHash { .. } => Operation::QueryHash,
            Request::QueryUserHash { .. } => Operation::QueryUserHash,
            Request::UploadSetting(_) => Operation::UploadSetting,
            Request::QuerySetting { .. } => Operation::QuerySetting,
            Request::QueryAllSetting => Operation::QueryAllSetting,
            Request::UploadTemp(_) => Operation::UploadTemp,
            Request::UploadSelectedTemp(_) => Operation::UploadSelectedTemp,
            Request::UpdateTemp(_) => Operation::UpdateTemp,
            Request::DeleteTemp { .. } => Operation::DeleteTemp,
            Request::QueryTemp => Operation::QueryTemp,
            Request::QuerySelectedTemp => Operation::QuerySelectedTemp,
        }
    }
}

fn record<T: DeserializeOwned>(operation: Operation, arg: Option<&[u8]>) -> DispatchResult<T> {
    let arg = arg.ok_or(DispatchError::MissingArgument { operation, expected: "JSON record" })?;
    serde_json::from_slice(arg).map_err(|e| DispatchError::Decode(e.to_string()))
}

fn identifier(
    operation: Operation,
    expected: &'static str,
    arg: Option<&[u8]>,
) -> DispatchResult<String> {
    let arg = arg.ok_or(DispatchError::MissingArgument { operation, expected })?;
    String::from_utf8(arg.to_vec())
        .map_err(|e| DispatchError::Decode(format!("{expected} is not UTF-8: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const NO_ARGS: &[&[u8]] = &[];

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = Request::parse("Query_Hash", NO_ARGS).unwrap_err();
        assert_eq!(err, DispatchError::UnknownOperation("Query_Hash".to_string()));
    }

    #[test]
    fn test_record_argument_is_decoded() {
        let req = Request::parse(
            "upload_hash",
            &[r#"{"hash":"abc123","name":"alice","date":"2024-01-01","description":"doc"}"#],
        )
        .unwrap();
        let expected = HashRecord::new("abc123", "alice", "2024-01-01", "doc");
        assert_eq!(req, Request::UploadHash(expected));
        assert_eq!(req.operation(), Operation::UploadHash);
    }

    #[test]
    fn test_identifier_argument_is_verbatim() {
        let req = Request::parse("query_user_hash", &[" alice "]).unwrap();
        assert_eq!(req, Request::QueryUserHash { owner: " alice ".to_string() });
    }

    #[test]
    fn test_missing_argument() {
        for name in
            ["upload_hash", "query_hash", "query_user_hash", "upload_setting", "delete_temp"]
        {
            let err = Request::parse(name, NO_ARGS).unwrap_err();
            assert!(matches!(err, DispatchError::MissingArgument { .. }), "{name}");
        }
    }

    #[test]
    fn test_argumentless_operations_ignore_extra_args() {
        assert_eq!(Request::parse("query_temp", &["ignored"]).unwrap(), Request::QueryTemp);
        assert_eq!(Request::parse("query_all_setting", NO_ARGS).unwrap(), Request::QueryAllSetting);
    }

    #[test]
    fn test_malformed_record() {
        let err = Request::parse("upload_temp", &["{\"name\": 42}"]).unwrap_err();
        assert!(matches!(err, DispatchError::Decode(_)));

        let err = Request::parse("update_temp", &["not json"]).unwrap_err();
        assert!(matches!(err, DispatchError::Decode(_)));
    }

    #[test]
    fn test_non_utf8_identifier() {
        let err = Request::parse("query_hash", &[&[0xff_u8, 0xfe][..]]).unwrap_err();
        assert!(matches!(err, DispatchError::Decode(_)));
    }

    #[test]
    fn test_write_classification() {
        let writes: Vec<_> = Operation::ALL.into_iter().filter(|op| op.is_write()).collect();
        assert_eq!(writes.len(), 6);
        assert!(!Operation::QuerySelectedTemp.is_write());
        assert!(Operation::DeleteTemp.is_write());
    }
}
