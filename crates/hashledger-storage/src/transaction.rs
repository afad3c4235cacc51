//! Atomic multi-key write batches.

use async_trait::async_trait;

use crate::StorageResult;

/// A buffered set of writes committed all-or-nothing.
///
/// Nothing is visible to readers until [`commit`](Transaction::commit)
/// succeeds. Dropping a transaction without committing discards it.
#[async_trait]
pub trait Transaction: Send {
    /// Buffers a write of `value` at `key`.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Buffers a removal of `key`.
    fn delete(&mut self, key: Vec<u8>);

    /// Applies every buffered operation atomically.
    ///
    /// A backend with optimistic concurrency may fail here with
    /// [`StorageError::Conflict`](crate::StorageError::Conflict).
    async fn commit(self: Box<Self>) -> StorageResult<()>;
}
