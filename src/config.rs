//! Run configuration
//!
//! Flags win over environment variables, which win over built-in defaults.
//! Environment contract:
//!
//! | Variable                 | Meaning                        |
//! |--------------------------|--------------------------------|
//! | `DOCSEED_DATASET`        | path to the dataset file       |
//! | `DOCSEED_COLLECTION`     | target collection name         |
//! | `DOCSEED_BATCH_CAPACITY` | documents per commit           |
//! | `DOCSEED_KEY_FIELD`      | document field holding the key |

use crate::dataset::DEFAULT_KEY_FIELD;
use crate::error::ConfigError;
use crate::loader::DEFAULT_BATCH_CAPACITY;
use eyre::{Context, Result, bail};
use std::path::PathBuf;

/// Resolved settings for one seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederConfig {
    /// Path to the dataset file.
    pub dataset: PathBuf,
    /// Collection every document is written into.
    pub collection: String,
    /// Documents per batch commit.
    pub capacity: usize,
    /// Field each record's key is taken from.
    pub key_field: String,
}

/// Resolve the dataset path from a flag or `DOCSEED_DATASET`.
pub fn resolve_dataset(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path),
        None => match std::env::var("DOCSEED_DATASET") {
            Ok(path) => Ok(PathBuf::from(path)),
            Err(_) => bail!("No dataset given; pass a path or set DOCSEED_DATASET"),
        },
    }
}

/// Resolve the key field from a flag, `DOCSEED_KEY_FIELD`, or the default.
pub fn resolve_key_field(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("DOCSEED_KEY_FIELD").ok())
        .unwrap_or_else(|| DEFAULT_KEY_FIELD.to_string())
}

impl SeederConfig {
    /// Resolve a config from CLI flags, falling back to the environment
    /// and then to defaults.
    ///
    /// # Errors
    /// Fails when neither flag nor environment provides a dataset path or
    /// collection name, or when `DOCSEED_BATCH_CAPACITY` is not a number.
    pub fn resolve(
        dataset: Option<PathBuf>,
        collection: Option<String>,
        capacity: Option<usize>,
        key_field: Option<String>,
    ) -> Result<Self> {
        let dataset = resolve_dataset(dataset)?;

        let collection = match collection {
            Some(name) => name,
            None => match std::env::var("DOCSEED_COLLECTION") {
                Ok(name) => name,
                Err(_) => {
                    bail!("No collection given; pass --collection or set DOCSEED_COLLECTION")
                }
            },
        };

        let capacity = match capacity {
            Some(capacity) => capacity,
            None => match std::env::var("DOCSEED_BATCH_CAPACITY") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("Invalid DOCSEED_BATCH_CAPACITY: {}", value))?,
                Err(_) => DEFAULT_BATCH_CAPACITY,
            },
        };

        let key_field = resolve_key_field(key_field);

        Ok(Self {
            dataset,
            collection,
            capacity,
            key_field,
        })
    }

    /// Check the parts the loader would reject, so a bad config fails
    /// before the dataset is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.collection.is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        Ok(())
    }
}
