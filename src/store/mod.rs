//! Document store backends
//!
//! The [`DocumentStore`] trait is the seam between the loader and whatever
//! holds the documents. [`HttpStore`] talks to a real store over its REST
//! commit endpoint, while [`MemoryStore`] keeps everything in process for
//! dry runs and tests.

use crate::error::StoreError;
use async_trait::async_trait;

mod auth;
mod batch;
mod http;
mod memory;

pub use auth::Auth;
pub use batch::{WriteBatch, WriteOp};
pub use http::HttpStore;
pub use memory::MemoryStore;

/// A transactional document store that applies batches of writes atomically.
///
/// Implementations must guarantee all-or-nothing semantics per call: when
/// [`commit`](DocumentStore::commit) returns `Ok` every write in the batch
/// is durable, and when it returns `Err` none of them are.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Apply every write in the batch as a single transaction.
    async fn commit(&self, batch: &WriteBatch) -> Result<(), StoreError>;
}
