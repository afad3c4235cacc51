//! The [`StorageBackend`] trait.

use std::ops::Range;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream::BoxStream, TryStreamExt};

use crate::{KeyValue, StorageResult, Transaction};

/// Lazy, key-ordered stream of entries produced by [`StorageBackend::scan`].
pub type KeyValueStream<'a> = BoxStream<'a, StorageResult<KeyValue>>;

/// Minimal contract over an ordered key-value store.
///
/// Keys are compared as raw bytes. Every other invariant (write-once records,
/// owner indexes, key layout) is enforced by the caller, not by the backend.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the value stored at `key`.
    ///
    /// A key that was never written and a key that was deleted are
    /// indistinguishable: both yield `None`.
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>>;

    /// Stores `value` at `key`, overwriting any previous value.
    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()>;

    /// Removes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &[u8]) -> StorageResult<()>;

    /// Iterates the entries whose keys fall in `range` (start inclusive, end
    /// exclusive), in ascending key order.
    ///
    /// Each call opens an independent cursor when the stream is first polled.
    /// The cursor is released when the stream is exhausted or dropped, so a
    /// consumer that stops early (including on its own error) leaks nothing.
    fn scan(&self, range: Range<Vec<u8>>) -> KeyValueStream<'_>;

    /// Collects a whole range into memory.
    async fn get_range(&self, range: Range<Vec<u8>>) -> StorageResult<Vec<KeyValue>> {
        self.scan(range).try_collect().await
    }

    /// Opens an atomic multi-key batch, if the backend supports one.
    ///
    /// Returns `None` when the backend cannot commit several keys atomically.
    async fn transaction(&self) -> StorageResult<Option<Box<dyn Transaction>>> {
        Ok(None)
    }
}
