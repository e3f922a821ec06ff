//! In-memory document store
//!
//! [`MemoryStore`] backs dry runs and tests with the same commit contract
//! the HTTP store promises: a batch applies atomically, writes within a
//! batch apply in encounter order, and merge writes deep-merge object
//! fields into whatever the collection already holds.

use super::{DocumentStore, WriteBatch};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, btree_map};
use tokio::sync::Mutex;

type Collection = BTreeMap<String, Map<String, Value>>;

/// Document store held entirely in process memory.
///
/// # Example
/// ```
/// use docstore_seeder::store::{DocumentStore, MemoryStore, WriteBatch};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), docstore_seeder::error::StoreError> {
/// let store = MemoryStore::new();
///
/// let mut batch = WriteBatch::new("municipios");
/// batch.upsert_merge("m-001", json!({"name": "Albacete"}).as_object().cloned().unwrap());
/// store.commit(&batch).await?;
///
/// assert_eq!(store.len("municipios").await, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
    commit_sizes: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, |documents| documents.len())
    }

    /// Fetch a copy of one document's fields, if the key exists.
    pub async fn document(&self, collection: &str, key: &str) -> Option<Map<String, Value>> {
        self.collections
            .lock()
            .await
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned()
    }

    /// Write counts of every commit applied so far, in order.
    pub async fn commit_sizes(&self) -> Vec<usize> {
        self.commit_sizes.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn commit(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        let collection = collections
            .entry(batch.collection().to_string())
            .or_default();

        for write in batch.writes() {
            match collection.entry(write.key.clone()) {
                btree_map::Entry::Occupied(mut slot) => {
                    if write.merge {
                        merge_fields(slot.get_mut(), write.fields.clone());
                    } else {
                        *slot.get_mut() = write.fields.clone();
                    }
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(write.fields.clone());
                }
            }
        }

        self.commit_sizes.lock().await.push(batch.len());
        Ok(())
    }
}

/// Merge incoming fields into existing ones. Nested objects merge
/// recursively, every other value type overwrites.
fn merge_fields(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (field, value) in incoming {
        match existing.entry(field) {
            Entry::Occupied(mut slot) => merge_value(slot.get_mut(), value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

fn merge_value(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(current), Value::Object(update)) => merge_fields(current, update),
        (existing, incoming) => *existing = incoming,
    }
}
