//! Chunked loading of datasets into a document store
//!
//! The loader stages one merge upsert per document and commits in
//! capacity-sized batches, stopping at the first failure.

mod committer;
mod report;

pub use committer::{BulkLoader, DEFAULT_BATCH_CAPACITY};
pub use report::LoadReport;
