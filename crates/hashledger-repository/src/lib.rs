//! Composite-key record layer for hashledger.
//!
//! This crate maps typed records onto flat, lexicographically ordered keys so
//! that point lookups, existence checks and bounded range scans can be served
//! by any [`StorageBackend`](hashledger_storage::StorageBackend).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  Dispatch Layer                  │
//! │              (hashledger-dispatch)               │
//! ├──────────────────────────────────────────────────┤
//! │                Repository Layer                  │
//! │   HashRepository   │  SettingRepository          │
//! │   TemplateRepository │ SelectedTemplateRepository│
//! │       (key encoding, serialization, indexing)    │
//! ├──────────────────────────────────────────────────┤
//! │               hashledger-storage                 │
//! │             StorageBackend trait                 │
//! │     (get, set, delete, scan, transaction)        │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Repositories
//!
//! - [`HashRepository`] - Write-once hash records with an owner index
//! - [`SettingRepository`] - Upserted user settings
//! - [`TemplateRepository`] - Named templates with create, update and delete
//! - [`SelectedTemplateRepository`] - The selected-template slot
//!
//! # Key Encoding
//!
//! The [`keys`] module builds and parses every key. Identifiers containing the
//! `#` delimiter are rejected before any key is built.
//!
//! # Error Handling
//!
//! All repository operations return [`RepositoryResult<T>`]. Point queries
//! report a missing record as `Ok(None)`; list queries return every record or
//! the first error, never a partial list.
//!
//! # Example
//!
//! ```ignore
//! use hashledger_storage::MemoryBackend;
//! use hashledger_repository::{HashRepository, TemplateRepository};
//!
//! let backend = MemoryBackend::new();
//! let hashes = HashRepository::new(backend.clone());
//! let templates = TemplateRepository::new(backend);
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod hash;
pub mod keys;
mod records;
pub mod selected;
pub mod setting;
pub mod storage;
pub mod template;

pub use error::{RepositoryError, RepositoryResult};
pub use hash::HashRepository;
pub use keys::{CompositeKey, KeyRange, Namespace};
pub use selected::SelectedTemplateRepository;
pub use setting::SettingRepository;
pub use storage::LedgerStorage;
pub use template::TemplateRepository;
