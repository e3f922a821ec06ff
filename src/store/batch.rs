//! Write batch staging
//!
//! A [`WriteBatch`] is a transient group of pending document mutations that a
//! store applies atomically: either every operation in the batch becomes
//! durable, or none do. A batch targets exactly one collection and is
//! discarded after its commit attempt, successful or not.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One staged upsert-with-merge: create the document at `key` if absent,
/// otherwise merge `fields` over it, preserving fields not present here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    pub key: String,
    pub fields: Map<String, Value>,
    /// Always true for this loader; carried on the wire so a commit request
    /// stays self-describing.
    #[serde(default = "default_merge")]
    pub merge: bool,
}

fn default_merge() -> bool {
    true
}

/// A batch of pending upsert-with-merge writes targeting one collection.
///
/// The batch does not coalesce duplicate keys: two writes to the same key
/// both stay staged, and the store merges them in order at apply time.
/// Capacity limits live in the committer, not here.
#[derive(Debug, Clone)]
pub struct WriteBatch {
    collection: String,
    writes: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch targeting `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            writes: Vec::new(),
        }
    }

    /// Stage an upsert-with-merge for `(collection, key)`.
    ///
    /// Keys must not be empty.
    pub fn upsert_merge(&mut self, key: &str, fields: Map<String, Value>) {
        assert!(!key.is_empty(), "key cannot be empty");
        self.writes.push(WriteOp {
            key: key.to_string(),
            fields,
            merge: true,
        });
    }

    /// The collection every write in this batch targets.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of pending operations.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether the batch has no pending operations.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// The staged operations in insertion order.
    pub fn writes(&self) -> &[WriteOp] {
        &self.writes
    }
}
