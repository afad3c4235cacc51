//! Repository for template records.
//!
//! # Key Schema
//!
//! - `temp#0#{name}` → JSON-serialized `TemplateRecord`

use hashledger_storage::StorageBackend;
use hashledger_types::TemplateRecord;

use crate::{
    error::{RepositoryError, RepositoryResult},
    keys, records,
};

/// Repository for named templates.
///
/// Unlike [`create_if_absent`](Self::create_if_absent), [`update`](Self::update)
/// performs no existence check and therefore also creates.
pub struct TemplateRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> TemplateRepository<S> {
    /// Create a new template repository with the given storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store a new template.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a template with the same name exists.
    /// Returns `InvalidIdentifier` if the name contains `#`.
    /// Returns an error if the storage operation fails.
    #[tracing::instrument(skip(self, record), fields(name = %record.name))]
    pub async fn create_if_absent(
        &self,
        record: TemplateRecord,
    ) -> RepositoryResult<TemplateRecord> {
        let key = keys::template::by_name(&record.name)?;
        if self.storage.get(&key).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(format!(
                "Template {} already exists",
                record.name
            )));
        }

        self.storage.set(key, records::encode(&record)?).await?;
        Ok(record)
    }

    /// Store a template, replacing any previous value for the same name.
    #[tracing::instrument(skip(self, record), fields(name = %record.name))]
    pub async fn update(&self, record: TemplateRecord) -> RepositoryResult<TemplateRecord> {
        let key = keys::template::by_name(&record.name)?;
        self.storage.set(key, records::encode(&record)?).await?;
        Ok(record)
    }

    /// Delete a template by name. Deleting an absent name succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> RepositoryResult<()> {
        let key = keys::template::by_name(name)?;
        self.storage.delete(&key).await?;
        Ok(())
    }

    /// Get a template by name.
    ///
    /// # Returns
    ///
    /// Returns `None` if no template is stored under the name.
    pub async fn get(&self, name: &str) -> RepositoryResult<Option<TemplateRecord>> {
        let key = keys::template::by_name(name)?;
        match self.storage.get(&key).await? {
            Some(data) => Ok(Some(records::decode(&key, &data)?)),
            None => Ok(None),
        }
    }

    /// List every template, ordered by name.
    pub async fn list_all(&self) -> RepositoryResult<Vec<TemplateRecord>> {
        records::scan_records(&self.storage, keys::template::range()).await
    }
}
