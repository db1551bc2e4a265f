//! Atomic multi-document writes.

use serde_json::Value;

use crate::{Document, StoreResult};

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert or replace a document.
    Put {
        collection: String,
        id: String,
        document: Value,
    },
    /// Delete a document if present.
    Delete { collection: String, id: String },
}

impl WriteOp {
    /// The collection this operation touches.
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Put { collection, .. } | WriteOp::Delete { collection, .. } => collection,
        }
    }
}

/// An ordered set of writes applied all-or-nothing by [`crate::DocumentStore::commit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an insert-or-replace of a typed document.
    pub fn put<T: Document>(&mut self, document: &T) -> StoreResult<&mut Self> {
        let value = serde_json::to_value(document)?;
        self.ops.push(WriteOp::Put {
            collection: T::COLLECTION.to_string(),
            id: document.id(),
            document: value,
        });
        Ok(self)
    }

    /// Queue a delete of a typed document by id.
    pub fn delete<T: Document>(&mut self, id: &str) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            collection: T::COLLECTION.to_string(),
            id: id.to_string(),
        });
        self
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Borrow the queued operations.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consume the batch into its operations.
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
