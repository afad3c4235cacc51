//! Fault injection for exercising failure paths.
//!
//! [`FaultyBackend`] wraps any backend and fails selected operations with
//! [`StorageError::Connection`] (or [`StorageError::Conflict`] for commits).

use std::{
    ops::Range,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use crate::{KeyValueStream, StorageBackend, StorageError, StorageResult, Transaction};

#[derive(Debug, Default)]
struct Counters {
    set_calls: AtomicUsize,
    fail_gets: AtomicBool,
}

/// Backend wrapper that injects storage failures.
///
/// Clones share call counters with the original.
#[derive(Debug, Clone)]
pub struct FaultyBackend<S> {
    inner: S,
    fail_set_at: Option<usize>,
    fail_scan_after: Option<usize>,
    conflict_on_commit: bool,
    counters: Arc<Counters>,
}

impl<S: StorageBackend> FaultyBackend<S> {
    /// Wraps `inner` without any faults armed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_set_at: None,
            fail_scan_after: None,
            conflict_on_commit: false,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Fails the `n`th call to `set` (1-based). Later calls succeed again.
    pub fn fail_nth_set(self, n: usize) -> Self {
        Self { fail_set_at: Some(n), ..self }
    }

    /// Makes every scan yield `n` entries and then an error.
    pub fn fail_scan_after(self, n: usize) -> Self {
        Self { fail_scan_after: Some(n), ..self }
    }

    /// Makes every transaction commit fail with a conflict.
    pub fn conflict_on_commit(self) -> Self {
        Self { conflict_on_commit: true, ..self }
    }

    /// Toggles failure of every `get`.
    pub fn set_fail_gets(&self, fail: bool) {
        self.counters.fail_gets.store(fail, Ordering::Release);
    }

    /// Number of `set` calls seen so far, including failed ones.
    pub fn set_calls(&self) -> usize {
        self.counters.set_calls.load(Ordering::Acquire)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StorageBackend> StorageBackend for FaultyBackend<S> {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        if self.counters.fail_gets.load(Ordering::Acquire) {
            return Err(StorageError::connection("injected get failure"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        let call = self.counters.set_calls.fetch_add(1, Ordering::AcqRel) + 1;
        if self.fail_set_at == Some(call) {
            return Err(StorageError::connection(format!("injected failure on set #{call}")));
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.inner.delete(key).await
    }

    fn scan(&self, range: Range<Vec<u8>>) -> KeyValueStream<'_> {
        let inner = self.inner.scan(range);
        match self.fail_scan_after {
            Some(n) => inner
                .take(n)
                .chain(futures::stream::once(async {
                    Err(StorageError::connection("injected scan failure"))
                }))
                .boxed(),
            None => inner,
        }
    }

    async fn transaction(&self) -> StorageResult<Option<Box<dyn Transaction>>> {
        let txn = self.inner.transaction().await?;
        if !self.conflict_on_commit {
            return Ok(txn);
        }
        Ok(txn.map(|inner| Box::new(ConflictingTransaction { inner }) as Box<dyn Transaction>))
    }
}

struct ConflictingTransaction {
    inner: Box<dyn Transaction>,
}

#[async_trait]
impl Transaction for ConflictingTransaction {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.inner.set(key, value);
    }

    fn delete(&mut self, key: Vec<u8>) {
        self.inner.delete(key);
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        Err(StorageError::conflict())
    }
}
