//! Document and dataset types
//!
//! A [`Document`] is a key-addressed record with an opaque set of fields. A
//! [`Dataset`] is the ordered, fully materialized sequence a bulk load runs
//! over.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// A key-addressed record with an opaque set of fields.
///
/// The key addresses the document inside a collection; the fields are
/// whatever the dataset carried, key field included. Key uniqueness across a
/// dataset is the caller's responsibility; the loader never enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    key: String,
    fields: Map<String, Value>,
}

impl Document {
    /// Create a document from a key and its fields.
    ///
    /// The key must be non-empty; [`DatasetReader`](super::DatasetReader)
    /// rejects records without a usable key before they get here.
    pub fn new(key: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    /// The document key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The document fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// An ordered, finite sequence of documents, fully materialized before
/// loading begins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    documents: Vec<Document>,
}

impl Dataset {
    /// Create a dataset from documents, preserving their order.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Number of documents in the dataset.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the dataset holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The documents in dataset order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Consume the dataset, yielding its documents in order.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Keys that appear more than once, in first-seen order.
    ///
    /// Duplicates are legal (a later document merges over an earlier one),
    /// but `docseed check` reports them so unintended collisions stay
    /// visible.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for document in &self.documents {
            let count = seen.entry(document.key()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(document.key());
            }
        }
        duplicates
    }
}

impl From<Vec<Document>> for Dataset {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}
