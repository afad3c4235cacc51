//! Record (de)serialization and range collection shared by the repositories.

use futures::StreamExt;
use hashledger_storage::StorageBackend;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{RepositoryError, RepositoryResult},
    keys::KeyRange,
};

/// Serialize a record for storage.
pub(crate) fn encode<T: Serialize>(record: &T) -> RepositoryResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Deserialize a stored record, naming the key in the error.
pub(crate) fn decode<T: DeserializeOwned>(key: &[u8], data: &[u8]) -> RepositoryResult<T> {
    serde_json::from_slice(data).map_err(|e| {
        RepositoryError::Decode(format!("{}: {}", String::from_utf8_lossy(key), e))
    })
}

/// Scan `range` and decode every value, in key order.
///
/// Stops at the first store or decode error. The scan stream is dropped on
/// return, which releases its cursor.
pub(crate) async fn scan_records<S, T>(storage: &S, range: KeyRange) -> RepositoryResult<Vec<T>>
where
    S: StorageBackend,
    T: DeserializeOwned,
{
    let mut stream = storage.scan(range.into());
    let mut records = Vec::new();
    while let Some(entry) = stream.next().await {
        let kv = entry?;
        records.push(decode(&kv.key, &kv.value)?);
    }
    Ok(records)
}
