//! Backend trait for document storage.

use async_trait::async_trait;
use serde_json::Value;

use crate::{StoreResult, WriteBatch};

/// A store of JSON documents grouped into named collections.
///
/// Backends must apply a [`WriteBatch`] atomically: either every operation
/// in the batch becomes visible or none does.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get a document by id.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// List every document in a collection, ordered by id.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Insert or replace a document.
    async fn put(&self, collection: &str, id: &str, document: Value) -> StoreResult<()>;

    /// Delete a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Apply a batch of writes atomically.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;
}
