//! The selected-template slot.
//!
//! A single well-known key holds the most recently selected template. It is
//! replaced on every set and never deleted.
//!
//! # Key Schema
//!
//! - `selectedtemp` → JSON-serialized `TemplateRecord`

use hashledger_storage::StorageBackend;
use hashledger_types::TemplateRecord;

use crate::{error::RepositoryResult, keys, records};

/// Repository for the selected-template singleton.
pub struct SelectedTemplateRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> SelectedTemplateRepository<S> {
    /// Create a new slot repository with the given storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Replace the selected template.
    ///
    /// The template is not required to exist in the template collection.
    #[tracing::instrument(skip(self, record), fields(name = %record.name))]
    pub async fn set(&self, record: TemplateRecord) -> RepositoryResult<TemplateRecord> {
        self.storage.set(keys::selected_template::slot(), records::encode(&record)?).await?;
        Ok(record)
    }

    /// Get the selected template, or `None` if none was ever selected.
    pub async fn get(&self) -> RepositoryResult<Option<TemplateRecord>> {
        let key = keys::selected_template::slot();
        match self.storage.get(&key).await? {
            Some(data) => Ok(Some(records::decode(&key, &data)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use hashledger_storage::MemoryBackend;

    use super::*;

    #[tokio::test]
    async fn test_unset_slot_is_none() {
        let repo = SelectedTemplateRepository::new(MemoryBackend::new());
        assert_eq!(repo.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_previous_selection() {
        let backend = MemoryBackend::new();
        let repo = SelectedTemplateRepository::new(backend.clone());

        repo.set(TemplateRecord::new("T1", "")).await.unwrap();
        repo.set(TemplateRecord::new("T2", "")).await.unwrap();

        assert_eq!(repo.get().await.unwrap(), Some(TemplateRecord::new("T2", "")));
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_slot_accepts_names_with_delimiter() {
        // The slot key does not embed the name
        let repo = SelectedTemplateRepository::new(MemoryBackend::new());
        repo.set(TemplateRecord::new("a#b", "")).await.unwrap();
        assert_eq!(repo.get().await.unwrap().unwrap().name, "a#b");
    }
}
