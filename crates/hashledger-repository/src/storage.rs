//! Unified storage facade for ledger records.
//!
//! This module provides [`LedgerStorage`] which combines all repositories
//! over one shared backend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   LedgerStorage<S>                   │
//! ├──────────┬─────────────┬──────────────┬──────────────┤
//! │ HashRepo │ SettingRepo │ TemplateRepo │ SelectedRepo │
//! └──────────┴─────────────┴──────────────┴──────────────┘
//!                          │
//!                          ▼
//!                  StorageBackend (S)
//! ```

use hashledger_storage::StorageBackend;

use crate::{HashRepository, SelectedTemplateRepository, SettingRepository, TemplateRepository};

/// Every record repository over one backend.
///
/// # Example
///
/// ```no_run
/// use hashledger_storage::MemoryBackend;
/// use hashledger_repository::LedgerStorage;
///
/// let storage = LedgerStorage::builder()
///     .backend(MemoryBackend::new())
///     .build();
/// ```
pub struct LedgerStorage<S: StorageBackend> {
    hashes: HashRepository<S>,
    settings: SettingRepository<S>,
    templates: TemplateRepository<S>,
    selected: SelectedTemplateRepository<S>,
}

#[bon::bon]
impl<S: StorageBackend + Clone> LedgerStorage<S> {
    /// Create a new ledger storage facade with the given backend.
    ///
    /// The backend is cloned for each repository; clones must share the
    /// same key space.
    #[builder]
    pub fn new(backend: S) -> Self {
        Self {
            hashes: HashRepository::new(backend.clone()),
            settings: SettingRepository::new(backend.clone()),
            templates: TemplateRepository::new(backend.clone()),
            selected: SelectedTemplateRepository::new(backend),
        }
    }
}

impl<S: StorageBackend> LedgerStorage<S> {
    /// Hash records and the owner index.
    #[inline]
    pub fn hashes(&self) -> &HashRepository<S> {
        &self.hashes
    }

    /// Setting records.
    #[inline]
    pub fn settings(&self) -> &SettingRepository<S> {
        &self.settings
    }

    /// Template records.
    #[inline]
    pub fn templates(&self) -> &TemplateRepository<S> {
        &self.templates
    }

    /// The selected-template slot.
    #[inline]
    pub fn selected(&self) -> &SelectedTemplateRepository<S> {
        &self.selected
    }
}
