//! In-memory backend.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::snapshot::Snapshot;
use crate::{DocumentStore, StoreResult, WriteBatch};

/// Document store held entirely in memory.
///
/// Batches are applied under a single write lock, so readers never observe a
/// half-applied batch.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Snapshot>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across all collections.
    pub async fn len(&self) -> usize {
        self.state.read().await.document_count()
    }

    /// Check if the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        Ok(self.state.read().await.get(collection, id))
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        Ok(self.state.read().await.list(collection))
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.state.write().await.put(collection, id, document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        Ok(self.state.write().await.delete(collection, id))
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        tracing::debug!(ops = batch.len(), "committing batch");
        self.state.write().await.apply(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Collection, Document};
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> String {
            self.id.clone()
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let notes = Collection::<Note>::new(store);

        notes.save(&note("n1", "hello")).await.unwrap();

        assert_eq!(notes.get("n1").await.unwrap(), Some(note("n1", "hello")));
        assert_eq!(notes.get("missing").await.unwrap(), None);
        assert!(notes.exists("n1").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let notes = Collection::<Note>::new(store);
        notes.save(&note("n1", "hello")).await.unwrap();

        assert!(notes.remove("n1").await.unwrap());
        assert!(!notes.remove("n1").await.unwrap());
        assert_eq!(notes.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_applies_every_op() {
        let store = Arc::new(InMemoryStore::new());
        let notes = Collection::<Note>::new(store.clone());
        notes.save(&note("old", "stale")).await.unwrap();

        let mut batch = WriteBatch::new();
        batch.put(&note("a", "first")).unwrap();
        batch.put(&note("b", "second")).unwrap();
        batch.delete::<Note>("old");
        store.commit(batch).await.unwrap();

        let all = notes.all().await.unwrap();
        assert_eq!(all, vec![note("a", "first"), note("b", "second")]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_filter() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let notes = Collection::<Note>::new(store);
        notes.save(&note("a", "keep")).await.unwrap();
        notes.save(&note("b", "drop")).await.unwrap();

        let kept = notes.filter(|n| n.body == "keep").await.unwrap();
        assert_eq!(kept, vec![note("a", "keep")]);
    }
}
