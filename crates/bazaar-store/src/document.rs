//! Typed access to a collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{DocumentStore, StoreError, StoreResult};

/// A type that is stored as a document in a named collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection name.
    const COLLECTION: &'static str;

    /// Key of this document within its collection.
    fn id(&self) -> String;
}

/// Type-safe view of one collection.
///
/// Provides automatic JSON serialization for any [`Document`].
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    /// Create a typed view over a store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Get a document by id.
    ///
    /// Returns `None` if the id doesn't exist.
    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(value) => decode(id, value).map(Some),
            None => Ok(None),
        }
    }

    /// Check if a document exists.
    pub async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.store.get(T::COLLECTION, id).await?.is_some())
    }

    /// Load every document in the collection.
    pub async fn all(&self) -> StoreResult<Vec<T>> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(|value| decode("?", value))
            .collect()
    }

    /// Load the documents matching a predicate.
    pub async fn filter<F>(&self, predicate: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.all().await?;
        docs.retain(|doc| predicate(doc));
        Ok(docs)
    }

    /// Count the documents in the collection.
    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.store.list(T::COLLECTION).await?.len())
    }

    /// Insert or replace a document.
    pub async fn save(&self, document: &T) -> StoreResult<()> {
        let value = serde_json::to_value(document)?;
        self.store.put(T::COLLECTION, &document.id(), value).await
    }

    /// Delete a document. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}

fn decode<T: Document>(id: &str, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::CorruptDocument {
        collection: T::COLLECTION.to_string(),
        id: id.to_string(),
        reason: e.to_string(),
    })
}
