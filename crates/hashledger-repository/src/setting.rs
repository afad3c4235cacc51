//! Repository for setting records.
//!
//! # Key Schema
//!
//! - `setting#0#{name}` → JSON-serialized `SettingRecord`

use hashledger_storage::StorageBackend;
use hashledger_types::SettingRecord;

use crate::{error::RepositoryResult, keys, records};

/// Repository for user settings.
///
/// Settings are always current: an upload overwrites whatever is stored
/// under the name, and there is no delete.
pub struct SettingRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> SettingRepository<S> {
    /// Create a new setting repository with the given storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store a setting, replacing any previous value for the same name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the name contains `#`.
    /// Returns an error if the storage operation fails.
    #[tracing::instrument(skip(self, record), fields(name = %record.name))]
    pub async fn upsert(&self, record: SettingRecord) -> RepositoryResult<SettingRecord> {
        let key = keys::setting::by_name(&record.name)?;
        self.storage.set(key, records::encode(&record)?).await?;
        Ok(record)
    }

    /// Get a setting by name.
    ///
    /// # Returns
    ///
    /// Returns `None` if no setting is stored under the name.
    pub async fn get(&self, name: &str) -> RepositoryResult<Option<SettingRecord>> {
        let key = keys::setting::by_name(name)?;
        match self.storage.get(&key).await? {
            Some(data) => Ok(Some(records::decode(&key, &data)?)),
            None => Ok(None),
        }
    }

    /// List every setting, ordered by name.
    pub async fn list_all(&self) -> RepositoryResult<Vec<SettingRecord>> {
        records::scan_records(&self.storage, keys::setting::range()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use hashledger_storage::MemoryBackend;

    use super::*;
    use crate::error::RepositoryError;

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let repo = SettingRepository::new(MemoryBackend::new());
        repo.upsert(SettingRecord::new("alice", "a@example.com", "")).await.unwrap();
        repo.upsert(SettingRecord::new("alice", "alice@example.com", "555-0100")).await.unwrap();

        let stored = repo.get("alice").await.unwrap().unwrap();
        assert_eq!(stored.email, "alice@example.com");
        assert_eq!(stored.phone, "555-0100");
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let repo = SettingRepository::new(MemoryBackend::new());
        assert_eq!(repo.get("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_all_excludes_other_namespaces() {
        let backend = MemoryBackend::new();
        let repo = SettingRepository::new(backend.clone());
        repo.upsert(SettingRecord::new("bob", "", "")).await.unwrap();
        repo.upsert(SettingRecord::new("alice", "", "")).await.unwrap();
        backend.set(b"temp#0#alice".to_vec(), b"{}".to_vec()).await.unwrap();
        backend.set(b"settings".to_vec(), b"not json".to_vec()).await.unwrap();
        backend.set(b"selectedtemp".to_vec(), b"{}".to_vec()).await.unwrap();

        let names: Vec<String> =
            repo.list_all().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_empty_namespace_lists_nothing() {
        let repo = SettingRepository::new(MemoryBackend::new());
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delimiter_in_name_is_rejected() {
        let repo = SettingRepository::new(MemoryBackend::new());
        let err = repo.upsert(SettingRecord::new("a#F", "", "")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidIdentifier { field: "name", .. }));
    }
}
