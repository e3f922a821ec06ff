//! Integration tests for the seeding pipeline
//!
//! These tests run the dataset-to-store flow end to end: a dataset file on
//! disk, the reader, the bulk loader, and an in-memory store standing in
//! for the remote.

use async_trait::async_trait;
use docstore_seeder::dataset::DatasetReader;
use docstore_seeder::error::{LoadError, StoreError};
use docstore_seeder::loader::BulkLoader;
use docstore_seeder::store::{DocumentStore, MemoryStore, WriteBatch};
use eyre::Result;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Store that rejects every commit after `allow` successful ones
struct FlakyStore {
    inner: MemoryStore,
    allow: usize,
    commits: AtomicUsize,
}

impl FlakyStore {
    fn new(allow: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            allow,
            commits: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn commit(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        let index = self.commits.fetch_add(1, Ordering::SeqCst);
        if index >= self.allow {
            return Err(StoreError::Rejected {
                status: 503,
                body: "maintenance window".to_string(),
            });
        }
        self.inner.commit(batch).await
    }
}

fn write_municipios(dir: &TempDir, count: usize) -> Result<PathBuf> {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("{:05}", i),
                "name": format!("Municipio {}", i),
                "province": "Albacete"
            })
        })
        .collect();

    let path = dir.path().join("municipios.json");
    std::fs::write(&path, serde_json::to_string_pretty(&records)?)?;
    Ok(path)
}

#[tokio::test]
async fn test_seed_json_array_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_municipios(&temp_dir, 1200)?;

    // Read the dataset file
    let dataset = DatasetReader::new(&path).read()?;
    assert_eq!(dataset.len(), 1200, "Should have read 1200 records");

    // Load into an in-memory store with the default capacity
    let store = MemoryStore::new();
    let report = BulkLoader::new(&store, "municipios").load(&dataset).await?;

    assert_eq!(report.committed, 1200);
    assert_eq!(report.batches, 3);
    assert_eq!(store.commit_sizes().await, vec![500, 500, 200]);

    // Spot-check one document round-tripped intact, key field included
    let doc = store.document("municipios", "00042").await.unwrap();
    assert_eq!(doc.get("id"), Some(&json!("00042")));
    assert_eq!(doc.get("name"), Some(&json!("Municipio 42")));

    Ok(())
}

#[tokio::test]
async fn test_seed_ndjson_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("municipios.ndjson");

    let mut lines = String::new();
    for i in 0..7 {
        lines.push_str(&serde_json::to_string(&json!({
            "id": format!("{:05}", i),
            "name": format!("Municipio {}", i)
        }))?);
        lines.push('\n');
    }
    std::fs::write(&path, lines)?;

    let dataset = DatasetReader::new(&path).read()?;
    let store = MemoryStore::new();
    let report = BulkLoader::new(&store, "municipios")
        .with_capacity(3)
        .load(&dataset)
        .await?;

    assert_eq!(report.committed, 7);
    assert_eq!(store.commit_sizes().await, vec![3, 3, 1]);

    Ok(())
}

#[tokio::test]
async fn test_custom_key_field_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("municipios.json");
    std::fs::write(
        &path,
        serde_json::to_string(&json!([
            {"code": "02003", "name": "Albacete"},
            {"code": "02009", "name": "Almansa"}
        ]))?,
    )?;

    let dataset = DatasetReader::new(&path).with_key_field("code").read()?;
    let store = MemoryStore::new();
    BulkLoader::new(&store, "municipios").load(&dataset).await?;

    assert!(store.document("municipios", "02003").await.is_some());
    assert!(store.document("municipios", "02009").await.is_some());

    Ok(())
}

#[tokio::test]
async fn test_failed_seed_leaves_contiguous_prefix() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_municipios(&temp_dir, 1200)?;
    let dataset = DatasetReader::new(&path).read()?;

    // Store goes down after two successful commits
    let store = FlakyStore::new(2);
    let result = BulkLoader::new(&store, "municipios").load(&dataset).await;

    let error = match result {
        Err(LoadError::Commit(error)) => error,
        other => panic!("expected commit error, got {:?}", other),
    };

    assert_eq!(error.batch_index, 2);
    assert_eq!(error.committed, 1000);
    assert_eq!(
        store.inner.len("municipios").await,
        1000,
        "Store should hold exactly the committed prefix"
    );

    // The prefix ends exactly at the last committed batch
    assert!(store.inner.document("municipios", "00999").await.is_some());
    assert!(store.inner.document("municipios", "01000").await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_rerun_after_failure_converges() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_municipios(&temp_dir, 10)?;
    let dataset = DatasetReader::new(&path).read()?;

    // First run dies on the second commit, leaving a 4-document prefix
    let flaky = FlakyStore::new(1);
    let loader = BulkLoader::new(&flaky, "municipios").with_capacity(4);
    assert!(loader.load(&dataset).await.is_err());
    assert_eq!(flaky.inner.len("municipios").await, 4);

    // Re-running the whole dataset against the recovered store re-merges
    // the prefix and fills in the rest
    let loader = BulkLoader::new(&flaky.inner, "municipios").with_capacity(4);
    let report = loader.load(&dataset).await?;

    assert_eq!(report.committed, 10);
    assert_eq!(flaky.inner.len("municipios").await, 10);

    Ok(())
}

#[tokio::test]
async fn test_reseeding_merges_updated_fields() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = MemoryStore::new();

    // First seed carries full records
    let v1 = temp_dir.path().join("v1.json");
    std::fs::write(
        &v1,
        serde_json::to_string(&json!([
            {"id": "02003", "name": "Albacete", "population": 170000}
        ]))?,
    )?;
    let dataset = DatasetReader::new(&v1).read()?;
    BulkLoader::new(&store, "municipios").load(&dataset).await?;

    // Second seed only refreshes the population
    let v2 = temp_dir.path().join("v2.json");
    std::fs::write(
        &v2,
        serde_json::to_string(&json!([
            {"id": "02003", "population": 173000}
        ]))?,
    )?;
    let dataset = DatasetReader::new(&v2).read()?;
    BulkLoader::new(&store, "municipios").load(&dataset).await?;

    let doc = store.document("municipios", "02003").await.unwrap();
    assert_eq!(
        doc.get("name"),
        Some(&json!("Albacete")),
        "Merge should keep fields absent from the update"
    );
    assert_eq!(doc.get("population"), Some(&json!(173000)));

    Ok(())
}
