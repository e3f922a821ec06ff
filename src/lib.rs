//! Document Store Seeder
//!
//! A chunked bulk loader that seeds key-addressed documents into a
//! transactional document store, one merge-upsert batch at a time

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod store;

// Re-exports for convenience
pub use config::SeederConfig;
pub use dataset::{Dataset, DatasetReader, Document};
pub use error::{CommitError, ConfigError, LoadError, ReadError, StoreError};
pub use loader::{BulkLoader, DEFAULT_BATCH_CAPACITY, LoadReport};
pub use store::{Auth, DocumentStore, HttpStore, MemoryStore, WriteBatch, WriteOp};
