//! Single-file JSON backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::snapshot::Snapshot;
use crate::{DocumentStore, StoreError, StoreResult, WriteBatch};

/// Document store persisted as one JSON file.
///
/// Every mutation is applied to a copy of the current state, written to a
/// temporary file, renamed over the data file, and only then published to
/// readers. A failed write leaves both the file and the in-memory state
/// untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<Snapshot>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating an empty one if the file is missing.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Snapshot::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::OpenError(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(StoreError::OpenError(format!("{}: {}", path.display(), e))),
        };

        tracing::debug!(path = %path.display(), documents = state.document_count(), "opened store");

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<R>(&self, change: impl FnOnce(&mut Snapshot) -> R) -> StoreResult<R> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let result = change(&mut next);
        self.persist(&next).await?;
        *state = next;
        Ok(result)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        Ok(self.state.read().await.get(collection, id))
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        Ok(self.state.read().await.list(collection))
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.mutate(|s| s.put(collection, id, document)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.mutate(|s| s.delete(collection, id)).await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        tracing::debug!(ops = batch.len(), path = %self.path.display(), "committing batch");
        self.mutate(|s| s.apply(batch)).await
    }
}
