//! In-memory storage backend for testing and development.

use std::{
    collections::BTreeMap,
    ops::Range,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use tokio::sync::RwLock;

use crate::{KeyValue, KeyValueStream, StorageBackend, StorageError, StorageResult, Transaction};

type KeyMap = BTreeMap<Vec<u8>, Bytes>;

/// Ordered in-memory backend.
///
/// Cloning is cheap and every clone shares the same key space, so several
/// repositories can sit on one store.
///
/// Scans read a point-in-time snapshot of the requested range and hold no
/// lock while the consumer iterates.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<KeyMap>>,
    open_cursors: Arc<AtomicUsize>,
    transactions: bool,
}

impl MemoryBackend {
    /// Creates an empty backend that supports atomic transactions.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            open_cursors: Arc::new(AtomicUsize::new(0)),
            transactions: true,
        }
    }

    /// Creates an empty backend that reports no transaction support.
    ///
    /// Models stores without multi-key atomic batches.
    pub fn without_transactions() -> Self {
        Self { transactions: false, ..Self::new() }
    }

    /// Number of scan cursors currently open.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::Acquire)
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Returns true if no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Copies every stored entry, in key order.
    pub async fn dump(&self) -> Vec<KeyValue> {
        self.data
            .read()
            .await
            .iter()
            .map(|(k, v)| KeyValue::new(Bytes::copy_from_slice(k), v.clone()))
            .collect()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.data.write().await.insert(key, Bytes::from(value));
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.data.write().await.remove(key);
        Ok(())
    }

    fn scan(&self, range: Range<Vec<u8>>) -> KeyValueStream<'_> {
        let data = Arc::clone(&self.data);
        let cursors = Arc::clone(&self.open_cursors);

        let open = async move {
            // BTreeMap::range panics on inverted bounds
            let entries = if range.start < range.end {
                data.read()
                    .await
                    .range(range)
                    .map(|(k, v)| KeyValue::new(Bytes::copy_from_slice(k), v.clone()))
                    .collect()
            } else {
                Vec::new()
            };
            Cursor::open(entries, cursors)
        };

        stream::once(open)
            .flat_map(|cursor| stream::iter(cursor.map(Ok::<_, StorageError>)))
            .boxed()
    }

    async fn transaction(&self) -> StorageResult<Option<Box<dyn Transaction>>> {
        if !self.transactions {
            return Ok(None);
        }
        Ok(Some(Box::new(MemoryTransaction { data: Arc::clone(&self.data), ops: Vec::new() })))
    }
}

/// Snapshot iterator that counts itself as an open cursor until dropped.
struct Cursor {
    entries: std::vec::IntoIter<KeyValue>,
    open_cursors: Arc<AtomicUsize>,
}

impl Cursor {
    fn open(entries: Vec<KeyValue>, open_cursors: Arc<AtomicUsize>) -> Self {
        open_cursors.fetch_add(1, Ordering::AcqRel);
        Self { entries: entries.into_iter(), open_cursors }
    }
}

impl Iterator for Cursor {
    type Item = KeyValue;

    fn next(&mut self) -> Option<KeyValue> {
        self.entries.next()
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.open_cursors.fetch_sub(1, Ordering::AcqRel);
    }
}

enum Op {
    Set(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

struct MemoryTransaction {
    data: Arc<RwLock<KeyMap>>,
    ops: Vec<Op>,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(Op::Set(key, value));
    }

    fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(Op::Delete(key));
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let mut data = self.data.write().await;
        tracing::trace!(ops = self.ops.len(), "Committing memory transaction");
        for op in self.ops {
            match op {
                Op::Set(key, value) => {
                    data.insert(key, Bytes::from(value));
                },
                Op::Delete(key) => {
                    data.remove(&key);
                },
            }
        }
        Ok(())
    }
}
