//! In-memory collection state shared by the backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{WriteBatch, WriteOp};

/// Every collection, keyed by collection name then document id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Snapshot {
    collections: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Snapshot {
    pub(crate) fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub(crate) fn list(&self, collection: &str) -> Vec<Value> {
        self.collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn put(&mut self, collection: &str, id: &str, document: Value) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
    }

    pub(crate) fn delete(&mut self, collection: &str, id: &str) -> bool {
        self.collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false)
    }

    pub(crate) fn apply(&mut self, batch: WriteBatch) {
        for op in batch.into_ops() {
            match op {
                WriteOp::Put {
                    collection,
                    id,
                    document,
                } => self.put(&collection, &id, document),
                WriteOp::Delete { collection, id } => {
                    self.delete(&collection, &id);
                }
            }
        }
    }

    pub(crate) fn document_count(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }
}
