//! Dataset file reading
//!
//! Decodes a dataset source into an ordered sequence of key-bearing
//! documents. Two formats are accepted: a JSON array of objects, and NDJSON
//! with one object per line, selected by file extension.

use super::{Dataset, Document};
use crate::error::ReadError;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default field a document's key is taken from.
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Read a dataset from a JSON array or NDJSON file.
///
/// # Example
/// ```no_run
/// use docstore_seeder::dataset::DatasetReader;
///
/// # fn example() -> Result<(), docstore_seeder::error::ReadError> {
/// let dataset = DatasetReader::new("data/municipios.json").read()?;
/// println!("{} document(s)", dataset.len());
/// # Ok(())
/// # }
/// ```
pub struct DatasetReader {
    path: PathBuf,
    key_field: String,
}

impl DatasetReader {
    /// Create a reader for the given dataset file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
        }
    }

    /// Take document keys from `field` instead of the default `"id"`.
    pub fn with_key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }

    /// Decode the source into a dataset.
    ///
    /// The input is never mutated. Fails with [`ReadError`] if the file is
    /// missing or unreadable, does not decode to a sequence of objects, or
    /// any element lacks a usable key.
    pub fn read(&self) -> Result<Dataset, ReadError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ReadError::Io {
            path: self.path.clone(),
            source,
        })?;

        let values = match self.path.extension().and_then(|s| s.to_str()) {
            Some("ndjson") => self.parse_ndjson(&content)?,
            _ => self.parse_array(&content)?,
        };

        let mut documents = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            documents.push(self.document(index, value)?);
        }

        log::debug!(
            "Decoded {} document(s) from {}",
            documents.len(),
            self.path.display()
        );

        Ok(Dataset::new(documents))
    }

    /// Parse a JSON array of documents.
    fn parse_array(&self, content: &str) -> Result<Vec<Value>, ReadError> {
        let value: Value = serde_json::from_str(content).map_err(|source| ReadError::Parse {
            path: self.path.clone(),
            source,
        })?;

        match value {
            Value::Array(values) => Ok(values),
            _ => Err(ReadError::NotASequence {
                path: self.path.clone(),
            }),
        }
    }

    /// Parse NDJSON, one document per line; blank lines are skipped.
    fn parse_ndjson(&self, content: &str) -> Result<Vec<Value>, ReadError> {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|source| ReadError::Parse {
                    path: self.path.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Turn one decoded element into a document, validating its key.
    fn document(&self, index: usize, value: Value) -> Result<Document, ReadError> {
        let Value::Object(fields) = value else {
            return Err(ReadError::NotAnObject { index });
        };

        let key = match fields.get(&self.key_field).and_then(|v| v.as_str()) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(ReadError::MissingKey {
                    index,
                    field: self.key_field.clone(),
                });
            }
        };

        // The whole record is kept as the document fields, key field
        // included, so a load writes exactly what the dataset carried.
        Ok(Document::new(key, fields))
    }
}
