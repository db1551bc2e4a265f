//! Store error types.

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when using the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a document.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// A stored document does not match the expected shape.
    #[error("Corrupt document {collection}/{id}: {reason}")]
    CorruptDocument {
        collection: String,
        id: String,
        reason: String,
    },

    /// Failed to persist the store to disk.
    #[error("Persistence failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused or failed the operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),
}

impl StoreError {
    /// Check if the failure is transient and the caller may try again.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::StoreError(_))
    }
}
