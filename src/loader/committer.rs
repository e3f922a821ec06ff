//! Chunked bulk loader
//!
//! [`BulkLoader`] walks a dataset in encounter order, staging one merge
//! upsert per document into a [`WriteBatch`]. Whenever the batch reaches
//! capacity it is committed and a fresh one started, and any trailing
//! partial batch is committed after the walk. The first commit failure
//! stops the load; everything committed before it stays committed, so the
//! store is always left holding a contiguous prefix of the dataset.

use crate::dataset::Dataset;
use crate::error::{CommitError, ConfigError, LoadError};
use crate::loader::LoadReport;
use crate::store::{DocumentStore, WriteBatch};
use std::mem;

/// Batch capacity used when none is configured, matching the transaction
/// size limit of common document stores.
pub const DEFAULT_BATCH_CAPACITY: usize = 500;

/// Loads a dataset into one collection of a document store, committing in
/// capacity-sized batches.
///
/// # Example
/// ```
/// use docstore_seeder::dataset::{Dataset, Document};
/// use docstore_seeder::loader::BulkLoader;
/// use docstore_seeder::store::MemoryStore;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), docstore_seeder::error::LoadError> {
/// let store = MemoryStore::new();
/// let dataset = Dataset::new(vec![Document::new(
///     "m-001",
///     json!({"id": "m-001", "name": "Albacete"}).as_object().cloned().unwrap(),
/// )]);
///
/// let report = BulkLoader::new(&store, "municipios").load(&dataset).await?;
/// assert_eq!(report.committed, 1);
/// # Ok(())
/// # }
/// ```
pub struct BulkLoader<'a, S: DocumentStore> {
    store: &'a S,
    collection: String,
    capacity: usize,
}

impl<'a, S: DocumentStore> BulkLoader<'a, S> {
    /// Create a loader targeting one collection, with the default batch
    /// capacity of [`DEFAULT_BATCH_CAPACITY`].
    pub fn new(store: &'a S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            capacity: DEFAULT_BATCH_CAPACITY,
        }
    }

    /// Override the batch capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Load every document of the dataset, in order.
    ///
    /// Duplicate keys are staged as separate writes; the store merges them
    /// when the batch applies, so the later occurrence wins field by field.
    ///
    /// # Returns
    /// A [`LoadReport`] whose `committed` count equals the dataset length.
    ///
    /// # Errors
    /// - [`LoadError::Config`] when the capacity is zero or the collection
    ///   name is empty, before anything is sent to the store
    /// - [`LoadError::Commit`] when a batch is rejected; the error carries
    ///   the failing batch index and the number of documents already
    ///   durable in the store
    pub async fn load(&self, dataset: &Dataset) -> Result<LoadReport, LoadError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity.into());
        }
        if self.collection.is_empty() {
            return Err(ConfigError::EmptyCollection.into());
        }

        log::debug!(
            "Loading {} document(s) into '{}' in batches of {}",
            dataset.len(),
            self.collection,
            self.capacity
        );

        let mut batch = WriteBatch::new(&self.collection);
        let mut committed = 0;
        let mut batches = 0;

        for document in dataset.documents() {
            batch.upsert_merge(document.key(), document.fields().clone());

            if batch.len() == self.capacity {
                let full = mem::replace(&mut batch, WriteBatch::new(&self.collection));
                committed += self.flush(full, committed, batches).await?;
                batches += 1;
            }
        }

        if !batch.is_empty() {
            committed += self.flush(batch, committed, batches).await?;
            batches += 1;
        }

        Ok(LoadReport { committed, batches })
    }

    /// Commit one batch, returning its size on success.
    async fn flush(
        &self,
        batch: WriteBatch,
        committed: usize,
        batch_index: usize,
    ) -> Result<usize, CommitError> {
        let size = batch.len();
        self.store
            .commit(&batch)
            .await
            .map_err(|source| CommitError {
                batch_index,
                committed,
                source,
            })?;

        log::debug!(
            "Committed batch {} with {} document(s) ({} total)",
            batch_index,
            size,
            committed + size
        );
        Ok(size)
    }
}
