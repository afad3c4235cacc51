//! Ordered key-value storage abstraction for hashledger.
//!
//! Provides the [`StorageBackend`] trait: the narrow capability set the record
//! layer needs from any backing store. Repositories are written against this
//! trait only, so the backing store can be swapped (in-memory map, embedded
//! ordered store, a ledger's world-state API) without touching record logic.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                Repository Layer                  │
//! │   HashRepository │ SettingRepository │ ...       │
//! ├──────────────────────────────────────────────────┤
//! │              hashledger-storage                  │
//! │              StorageBackend trait                │
//! │   (get, set, delete, scan, transaction)          │
//! ├──────────────────────────────────────────────────┤
//! │   MemoryBackend   │   (host-provided backends)   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use hashledger_storage::{MemoryBackend, StorageBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MemoryBackend::new();
//!
//!     backend.set(b"temp#0#invoice".to_vec(), b"{}".to_vec()).await?;
//!     let value = backend.get(b"temp#0#invoice").await?;
//!     assert!(value.is_some());
//!
//!     let entries = backend.get_range(b"temp#0".to_vec()..b"temp#F".to_vec()).await?;
//!     assert_eq!(entries.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! # Atomic Batches
//!
//! [`StorageBackend::transaction`] is optional. Backends that can commit several
//! keys atomically return a [`Transaction`]; backends that cannot return `None`
//! and callers fall back to ordered single-key writes.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables [`testutil`] with a fault-injecting backend wrapper for
//!   exercising failure paths in dependent crates.

#![deny(unsafe_code)]

pub mod backend;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
pub mod transaction;
pub mod types;

pub use backend::{KeyValueStream, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
pub use transaction::Transaction;
pub use types::KeyValue;
