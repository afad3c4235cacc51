//! Repository for hash records and their owner index.
//!
//! This module provides [`HashRepository`] which stores write-once
//! [`HashRecord`]s and maintains a per-owner index purely through key
//! structure.
//!
//! # Key Schema
//!
//! - `Hash#0#{hash}` → JSON-serialized `HashRecord`
//! - `User#{owner}#0#{hash}` → the same JSON, for owner scans
//!
//! # Compound Writes
//!
//! A create writes both keys. When the backend offers a transaction they are
//! committed together. Otherwise the index entry is written first: an index
//! entry without its primary is ignored by [`HashRepository::list_scoped`], so
//! a failure between the two writes never exposes a half-created record. That
//! failure is reported as [`RepositoryError::PartialWrite`] and repeating the
//! create completes it.

use hashledger_storage::StorageBackend;
use hashledger_types::HashRecord;

use crate::{
    error::{RepositoryError, RepositoryResult},
    keys, records,
};

/// Repository for hash record operations.
///
/// # Type Parameters
///
/// * `S` - A type implementing [`StorageBackend`] for underlying storage operations.
///
/// # Example
///
/// ```ignore
/// use hashledger_storage::MemoryBackend;
/// use hashledger_repository::HashRepository;
///
/// let repo = HashRepository::new(MemoryBackend::new());
/// repo.create_if_absent(HashRecord::new("abc123", "alice", "2024-01-01", "doc")).await?;
/// ```
pub struct HashRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> HashRepository<S> {
    /// Create a new hash repository with the given storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store a new hash record and its owner index entry.
    ///
    /// # Arguments
    ///
    /// * `record` - The record to store. Its `hash` is the primary identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the hash or owner contains `#`.
    /// Returns `AlreadyExists` if a record with the same hash exists; the
    /// stored state is left untouched.
    /// Returns `PartialWrite` if the index entry was stored but the primary
    /// write failed.
    /// Returns an error if any other storage operation fails.
    #[tracing::instrument(
        skip(self, record),
        fields(hash = %record.hash, owner = %record.owner_name)
    )]
    pub async fn create_if_absent(&self, record: HashRecord) -> RepositoryResult<HashRecord> {
        let primary_key = keys::hash::by_hash(&record.hash)?;
        let index_key = keys::owner::entry(&record.owner_name, &record.hash)?;

        if self.storage.get(&primary_key).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(format!(
                "Hash {} already exists",
                record.hash
            )));
        }

        let data = records::encode(&record)?;

        match self.storage.transaction().await? {
            Some(mut txn) => {
                txn.set(index_key, data.clone());
                txn.set(primary_key, data);
                txn.commit().await?;
            },
            None => {
                self.storage.set(index_key.clone(), data.clone()).await?;
                if let Err(err) = self.storage.set(primary_key.clone(), data).await {
                    tracing::warn!(error = %err, "Primary write failed after owner index write");
                    return Err(RepositoryError::PartialWrite {
                        written: String::from_utf8_lossy(&index_key).into_owned(),
                        missing: String::from_utf8_lossy(&primary_key).into_owned(),
                        reason: err.to_string(),
                    });
                }
            },
        }

        tracing::debug!("Hash record created");
        Ok(record)
    }

    /// Get a hash record by hash.
    ///
    /// # Returns
    ///
    /// Returns `None` if no record is stored under the hash.
    pub async fn get(&self, hash: &str) -> RepositoryResult<Option<HashRecord>> {
        match self.primary(hash).await {
            Ok(record) => Ok(Some(record)),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// List every hash record, ordered by hash.
    ///
    /// # Errors
    ///
    /// Fails on the first record that cannot be decoded or on any storage
    /// error; no partial list is returned.
    pub async fn list_all(&self) -> RepositoryResult<Vec<HashRecord>> {
        records::scan_records(&self.storage, keys::hash::range()).await
    }

    /// List the hash records registered by one owner, ordered by hash.
    ///
    /// Index entries whose primary record is missing, or belongs to another
    /// owner, are left out.
    ///
    /// # Consistency
    ///
    /// The owner range is read as one snapshot, but each primary record is
    /// then fetched with its own point read. A write landing between the scan
    /// and those reads can be seen by the point reads only. Callers that need
    /// a single view must serialize writers, as the dispatcher does.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner name to scan.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the owner contains `#`.
    /// Fails on the first index entry that cannot be decoded or on any
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn list_scoped(&self, owner: &str) -> RepositoryResult<Vec<HashRecord>> {
        let range = keys::owner::range(owner)?;
        let entries = self.storage.get_range(range.into()).await?;

        let mut hashes = Vec::with_capacity(entries.len());
        for kv in &entries {
            let _: HashRecord = records::decode(&kv.key, &kv.value)?;
            let key = keys::parse(&kv.key).ok_or_else(|| {
                RepositoryError::Decode(format!(
                    "{}: not an owner index key",
                    String::from_utf8_lossy(&kv.key)
                ))
            })?;
            hashes.push(key.id);
        }

        let mut records = Vec::with_capacity(hashes.len());
        for hash in hashes {
            match self.primary(&hash).await {
                Ok(record) if record.owner_name == owner => records.push(record),
                Ok(record) => {
                    tracing::warn!(
                        hash = %hash,
                        holder = %record.owner_name,
                        "Skipping stale owner index entry"
                    );
                },
                Err(RepositoryError::NotFound(_)) => {
                    tracing::warn!(
                        hash = %hash,
                        "Skipping owner index entry without primary record"
                    );
                },
                Err(err) => return Err(err),
            }
        }

        Ok(records)
    }

    /// Fetch the primary record, reporting absence as `NotFound`.
    async fn primary(&self, hash: &str) -> RepositoryResult<HashRecord> {
        let key = keys::hash::by_hash(hash)?;
        match self.storage.get(&key).await? {
            Some(data) => records::decode(&key, &data),
            None => Err(RepositoryError::NotFound(format!("Hash {} not found", hash))),
        }
    }

    /// Access the underlying storage backend.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use hashledger_storage::{testutil::FaultyBackend, MemoryBackend};

    use super::*;

    fn record(hash: &str, owner: &str) -> HashRecord {
        HashRecord::new(hash, owner, "2024-01-01", "doc")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = HashRepository::new(MemoryBackend::new());
        let created = repo.create_if_absent(record("abc123", "alice")).await.unwrap();

        let fetched = repo.get("abc123").await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let repo = HashRepository::new(MemoryBackend::new());
        assert_eq!(repo.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_writes_primary_and_index() {
        let backend = MemoryBackend::new();
        let repo = HashRepository::new(backend.clone());
        repo.create_if_absent(record("abc123", "alice")).await.unwrap();

        let keys: Vec<_> = backend.dump().await.into_iter().map(|kv| kv.key).collect();
        assert_eq!(keys, vec![&b"Hash#0#abc123"[..], &b"User#alice#0#abc123"[..]]);
    }

    #[tokio::test]
    async fn test_duplicate_hash_is_rejected_without_changes() {
        let backend = MemoryBackend::new();
        let repo = HashRepository::new(backend.clone());
        repo.create_if_absent(record("abc123", "alice")).await.unwrap();
        let before = backend.dump().await;

        let err = repo.create_if_absent(record("abc123", "bob")).await.unwrap_err();

        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
        assert_eq!(backend.dump().await, before);
        assert!(repo.list_scoped("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_scoped_returns_only_that_owner_in_key_order() {
        let repo = HashRepository::new(MemoryBackend::new());
        for (hash, owner) in [("h3", "alice"), ("h1", "alice"), ("h2", "bob"), ("h0", "alice0")] {
            repo.create_if_absent(record(hash, owner)).await.unwrap();
        }

        let hashes: Vec<String> =
            repo.list_scoped("alice").await.unwrap().into_iter().map(|r| r.hash).collect();

        assert_eq!(hashes, vec!["h1", "h3"]);
        assert_eq!(repo.list_scoped("bob").await.unwrap().len(), 1);
        assert!(repo.list_scoped("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_by_hash() {
        let repo = HashRepository::new(MemoryBackend::new());
        for hash in ["b", "a", "c"] {
            repo.create_if_absent(record(hash, "alice")).await.unwrap();
        }

        let hashes: Vec<String> =
            repo.list_all().await.unwrap().into_iter().map(|r| r.hash).collect();
        assert_eq!(hashes, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_invalid_identifiers_write_nothing() {
        let backend = MemoryBackend::new();
        let repo = HashRepository::new(backend.clone());

        let err = repo.create_if_absent(record("abc", "alice#0")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidIdentifier { field: "owner_name", .. }));

        let err = repo.create_if_absent(record("a#b", "alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidIdentifier { field: "hash", .. }));

        assert!(backend.is_empty().await);
        assert!(repo.list_scoped("x#").await.is_err());
    }

    #[tokio::test]
    async fn test_create_without_transactions() {
        let backend = MemoryBackend::without_transactions();
        let repo = HashRepository::new(backend.clone());

        repo.create_if_absent(record("abc123", "alice")).await.unwrap();

        assert_eq!(backend.len().await, 2);
        assert_eq!(repo.list_scoped("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_write_is_reported_and_repairable() {
        let inner = MemoryBackend::without_transactions();
        let backend = FaultyBackend::new(inner.clone()).fail_nth_set(2);
        let repo = HashRepository::new(backend);

        let err = repo.create_if_absent(record("abc123", "alice")).await.unwrap_err();
        match err {
            RepositoryError::PartialWrite { written, missing, .. } => {
                assert_eq!(written, "User#alice#0#abc123");
                assert_eq!(missing, "Hash#0#abc123");
            },
            other => panic!("unexpected error: {other:?}"),
        }

        // The orphaned index entry stays invisible
        assert_eq!(repo.get("abc123").await.unwrap(), None);
        assert!(repo.list_scoped("alice").await.unwrap().is_empty());

        repo.create_if_absent(record("abc123", "alice")).await.unwrap();
        assert_eq!(repo.list_scoped("alice").await.unwrap().len(), 1);
        assert_eq!(inner.len().await, 2);
    }

    #[tokio::test]
    async fn test_stale_index_entry_of_another_owner_is_skipped() {
        let inner = MemoryBackend::without_transactions();
        let repo = HashRepository::new(FaultyBackend::new(inner.clone()).fail_nth_set(2));

        repo.create_if_absent(record("abc123", "alice")).await.unwrap_err();
        repo.create_if_absent(record("abc123", "bob")).await.unwrap();

        assert!(repo.list_scoped("alice").await.unwrap().is_empty());
        assert_eq!(repo.list_scoped("bob").await.unwrap()[0].owner_name, "bob");
    }

    #[tokio::test]
    async fn test_list_scoped_reads_current_primary() {
        let backend = MemoryBackend::new();
        let repo = HashRepository::new(backend.clone());
        repo.create_if_absent(record("abc123", "alice")).await.unwrap();

        let revised = HashRecord::new("abc123", "alice", "2024-02-02", "revised");
        let value = serde_json::to_vec(&revised).unwrap();
        backend.set(b"Hash#0#abc123".to_vec(), value).await.unwrap();

        assert_eq!(repo.list_scoped("alice").await.unwrap(), vec![revised]);
    }

    #[tokio::test]
    async fn test_commit_conflict_writes_nothing() {
        let inner = MemoryBackend::new();
        let repo = HashRepository::new(FaultyBackend::new(inner.clone()).conflict_on_commit());

        let err = repo.create_if_absent(record("abc123", "alice")).await.unwrap_err();

        assert_eq!(err, RepositoryError::Conflict);
        assert!(inner.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let backend = FaultyBackend::new(MemoryBackend::new());
        let repo = HashRepository::new(backend.clone());
        backend.set_fail_gets(true);

        let err = repo.get("abc123").await.unwrap_err();
        assert!(matches!(err, RepositoryError::StoreUnavailable(_)));

        let err = repo.create_if_absent(record("abc123", "alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_list_scoped_fails_fast_on_corrupt_entry() {
        let backend = MemoryBackend::new();
        let repo = HashRepository::new(backend.clone());
        repo.create_if_absent(record("h1", "alice")).await.unwrap();
        backend.set(b"User#alice#0#h2".to_vec(), b"{broken".to_vec()).await.unwrap();

        let err = repo.list_scoped("alice").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Decode(_)));
        assert_eq!(backend.open_cursors(), 0);
    }

    #[tokio::test]
    async fn test_empty_owner_is_its_own_scope() {
        let repo = HashRepository::new(MemoryBackend::new());
        repo.create_if_absent(record("h1", "")).await.unwrap();
        repo.create_if_absent(record("h2", "alice")).await.unwrap();

        let anonymous = repo.list_scoped("").await.unwrap();
        assert_eq!(anonymous.len(), 1);
        assert_eq!(anonymous[0].hash, "h1");
    }
}
