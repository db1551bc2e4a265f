//! Document store layer for the Bazaar storefront.
//!
//! Stores JSON documents in named collections, keyed by id, with automatic
//! serialization through the [`Document`] trait and atomic multi-document
//! writes through [`WriteBatch`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bazaar_store::{Collection, Document, DocumentStore, InMemoryStore, WriteBatch};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Note {
//!     id: String,
//!     body: String,
//! }
//!
//! impl Document for Note {
//!     const COLLECTION: &'static str = "notes";
//!     fn id(&self) -> String {
//!         self.id.clone()
//!     }
//! }
//!
//! let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
//! let notes = Collection::<Note>::new(store.clone());
//!
//! notes.save(&Note { id: "n1".into(), body: "hello".into() }).await?;
//! let note: Option<Note> = notes.get("n1").await?;
//!
//! // Several writes that must land together
//! let mut batch = WriteBatch::new();
//! batch.put(&Note { id: "n2".into(), body: "two".into() })?;
//! batch.delete::<Note>("n1");
//! store.commit(batch).await?;
//! ```

mod batch;
mod document;
mod error;
mod file;
mod memory;
mod snapshot;
mod store;

pub use batch::{WriteBatch, WriteOp};
pub use document::{Collection, Document};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use store::DocumentStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Collection, Document, DocumentStore, InMemoryStore, JsonFileStore, StoreError,
        StoreResult, WriteBatch,
    };
}
