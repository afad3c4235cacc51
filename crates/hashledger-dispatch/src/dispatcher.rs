//! Maps invocations onto repository calls.

use bytes::Bytes;
use hashledger_repository::LedgerStorage;
use hashledger_storage::StorageBackend;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    error::{DispatchError, DispatchResult},
    metrics::{DispatchMetrics, OpTimer},
    operation::Request,
    response::Response,
};

/// Entry point for invocations.
///
/// One invocation runs at a time; concurrent callers queue on an internal
/// lock. Races between separate dispatchers sharing a store are left to the
/// store, which may reject a commit with a conflict.
///
/// # Example
///
/// ```ignore
/// use hashledger_dispatch::Dispatcher;
/// use hashledger_storage::MemoryBackend;
///
/// let dispatcher = Dispatcher::builder().backend(MemoryBackend::new()).build();
/// let response = dispatcher.invoke("query_temp", &[] as &[&[u8]]).await;
/// assert_eq!(response.payload().map(|p| p.as_ref()), Some(&b"[]"[..]));
/// ```
pub struct Dispatcher<S: StorageBackend> {
    storage: LedgerStorage<S>,
    metrics: DispatchMetrics,
    gate: Mutex<()>,
}

#[bon::bon]
impl<S: StorageBackend + Clone> Dispatcher<S> {
    /// Create a dispatcher over the given backend.
    #[builder]
    pub fn new(backend: S) -> Self {
        Self::from_storage(LedgerStorage::builder().backend(backend).build())
    }
}

impl<S: StorageBackend> Dispatcher<S> {
    /// Create a dispatcher over an existing storage facade.
    pub fn from_storage(storage: LedgerStorage<S>) -> Self {
        Self { storage, metrics: DispatchMetrics::new(), gate: Mutex::new(()) }
    }

    /// Run one raw invocation to completion.
    ///
    /// Never fails: every outcome, including an unknown operation or a
    /// malformed argument, is reported as a [`Response`].
    #[tracing::instrument(skip(self, args), fields(args = args.len()))]
    pub async fn invoke<A: AsRef<[u8]>>(&self, function: &str, args: &[A]) -> Response {
        match Request::parse(function, args) {
            Ok(request) => self.execute(request).await.into(),
            Err(err) => {
                self.metrics.record_rejected();
                tracing::warn!(error = %err, "Rejected invocation");
                Response::error(err.to_string())
            },
        }
    }

    /// Run one decoded request to completion and return its payload.
    pub async fn execute(&self, request: Request) -> DispatchResult<Bytes> {
        let _turn = self.gate.lock().await;

        let operation = request.operation();
        let timer = OpTimer::new();
        let result = self.run(request).await;
        let elapsed = timer.elapsed();

        if operation.is_write() {
            self.metrics.record_write(elapsed, result.is_err());
        } else {
            self.metrics.record_read(elapsed, result.is_err());
        }

        match &result {
            Ok(payload) => {
                tracing::debug!(%operation, bytes = payload.len(), "Invocation succeeded");
            },
            Err(err) => {
                tracing::warn!(%operation, error = %err, "Invocation failed");
            },
        }
        result
    }

    async fn run(&self, request: Request) -> DispatchResult<Bytes> {
        match request {
            Request::UploadHash(record) => {
                self.storage.hashes().create_if_absent(record).await?;
                Ok(Bytes::new())
            },
            Request::QueryHash { hash } => json(&self.storage.hashes().get(&hash).await?),
            Request::QueryUserHash { owner } => {
                json(&self.storage.hashes().list_scoped(&owner).await?)
            },
            Request::UploadSetting(record) => {
                self.storage.settings().upsert(record).await?;
                Ok(Bytes::new())
            },
            Request::QuerySetting { name } => json(&self.storage.settings().get(&name).await?),
            Request::QueryAllSetting => json(&self.storage.settings().list_all().await?),
            Request::UploadTemp(record) => {
                self.storage.templates().create_if_absent(record).await?;
                Ok(Bytes::new())
            },
            Request::UploadSelectedTemp(record) => {
                self.storage.selected().set(record).await?;
                Ok(Bytes::new())
            },
            Request::UpdateTemp(record) => {
                self.storage.templates().update(record).await?;
                Ok(Bytes::new())
            },
            Request::DeleteTemp { name } => {
                self.storage.templates().delete(&name).await?;
                Ok(Bytes::new())
            },
            Request::QueryTemp => json(&self.storage.templates().list_all().await?),
            Request::QuerySelectedTemp => match self.storage.selected().get().await? {
                Some(record) => json(&record),
                None => Ok(Bytes::new()),
            },
        }
    }

    /// Invocation metrics.
    #[inline]
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// The underlying storage facade.
    #[inline]
    pub fn storage(&self) -> &LedgerStorage<S> {
        &self.storage
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> DispatchResult<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|e| DispatchError::Serialization(e.to_string()))
}
