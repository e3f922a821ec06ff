//! CLI helper functions

use crate::config::{SeederConfig, resolve_dataset, resolve_key_field};
use crate::dataset::{Dataset, DatasetReader};
use crate::error::LoadError;
use crate::loader::{BulkLoader, LoadReport};
use crate::store::{Auth, DocumentStore, HttpStore, MemoryStore};
use eyre::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

/// Load a document store client from environment variables
///
/// Expected environment variables:
/// - DOCSEED_URL: Store base URL (required)
/// - DOCSEED_USERNAME: Username for basic auth (optional)
/// - DOCSEED_PASSWORD: Password for basic auth (optional)
/// - DOCSEED_APIKEY: API key for auth (optional, conflicts with username/password)
pub fn load_store_from_env() -> Result<HttpStore> {
    let url_str =
        std::env::var("DOCSEED_URL").context("DOCSEED_URL environment variable not set")?;
    let url = Url::parse(&url_str).with_context(|| format!("Invalid DOCSEED_URL: {}", url_str))?;

    let auth = if let Ok(apikey) = std::env::var("DOCSEED_APIKEY") {
        Auth::Apikey(apikey)
    } else if let (Ok(username), Ok(password)) = (
        std::env::var("DOCSEED_USERNAME"),
        std::env::var("DOCSEED_PASSWORD"),
    ) {
        Auth::Basic(username, password)
    } else {
        Auth::None
    };
    log::debug!("Using {} auth", auth);

    HttpStore::try_new(url, auth).context("Failed to create store client")
}

/// Seed a collection from a dataset file
///
/// Pipeline: DatasetReader → regex filters → BulkLoader → store
/// With `dry_run` the same pipeline runs against an in-memory store, so the
/// dataset and batching are exercised without touching the real one.
pub async fn seed(
    config: &SeederConfig,
    include: Option<String>,
    exclude: Option<String>,
    dry_run: bool,
) -> Result<LoadReport> {
    config.validate()?;

    log::info!("Reading dataset from {}", config.dataset.display());
    let reader = DatasetReader::new(&config.dataset).with_key_field(&config.key_field);
    let dataset = reader.read()?;
    log::info!("Read {} document(s) from disk", dataset.len());

    let dataset = filter_dataset(dataset, include, exclude)?;

    let duplicates = dataset.duplicate_keys();
    if !duplicates.is_empty() {
        log::warn!(
            "{} duplicate key(s) will merge on load: {}",
            duplicates.len(),
            duplicates.join(", ")
        );
    }

    let report = if dry_run {
        log::info!("Dry run: loading into an in-memory store");
        let store = MemoryStore::new();
        let report = run_load(&store, config, &dataset).await?;
        log::info!(
            "Dry run: store holds {} distinct document(s)",
            store.len(&config.collection).await
        );
        report
    } else {
        log::info!("Connecting to document store...");
        let store = load_store_from_env()?;
        run_load(&store, config, &dataset).await?
    };

    log::info!("✓ Seeded '{}': {}", config.collection, report);

    Ok(report)
}

/// Inspect a dataset without touching any store
///
/// Reports the document count and warns about duplicate keys, which merge
/// instead of erroring when seeded.
pub fn check(dataset: Option<PathBuf>, key_field: Option<String>) -> Result<usize> {
    let path = resolve_dataset(dataset)?;
    let key_field = resolve_key_field(key_field);

    log::info!("Reading dataset from {}", path.display());
    let reader = DatasetReader::new(&path).with_key_field(&key_field);
    let dataset = reader.read()?;

    let duplicates = dataset.duplicate_keys();
    if duplicates.is_empty() {
        log::info!("✓ {} document(s), all keys distinct", dataset.len());
    } else {
        let distinct: HashSet<&str> = dataset
            .documents()
            .iter()
            .map(|document| document.key())
            .collect();

        log::warn!(
            "{} duplicate key(s) will merge on load: {}",
            duplicates.len(),
            duplicates.join(", ")
        );
        log::info!(
            "✓ {} document(s), {} distinct key(s)",
            dataset.len(),
            distinct.len()
        );
    }

    Ok(dataset.len())
}

/// Verify connectivity and credentials against the configured store
pub async fn auth() -> Result<()> {
    log::info!("Connecting to document store...");
    let store = load_store_from_env()?;

    store
        .test_connection()
        .await
        .with_context(|| format!("Failed to reach store at {}", store))?;

    log::info!("✓ Store connection successful: {}", store);

    Ok(())
}

/// Run the bulk loader against any store, logging the durable prefix when a
/// commit fails partway
async fn run_load<S: DocumentStore>(
    store: &S,
    config: &SeederConfig,
    dataset: &Dataset,
) -> Result<LoadReport> {
    let loader = BulkLoader::new(store, &config.collection).with_capacity(config.capacity);

    match loader.load(dataset).await {
        Ok(report) => Ok(report),
        Err(LoadError::Commit(error)) => {
            log::error!(
                "Load stopped at batch {}: the first {} document(s) stay committed",
                error.batch_index,
                error.committed
            );
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}

/// Apply include and exclude regex filters to document keys
///
/// Include runs first, then exclude.
fn filter_dataset(
    dataset: Dataset,
    include: Option<String>,
    exclude: Option<String>,
) -> Result<Dataset> {
    let mut documents = dataset.into_documents();

    if let Some(include_pattern) = &include {
        let regex = regex::Regex::new(include_pattern)
            .with_context(|| format!("Invalid include regex pattern: {}", include_pattern))?;

        documents.retain(|document| regex.is_match(document.key()));

        log::info!(
            "After include filter '{}': {} document(s)",
            include_pattern,
            documents.len()
        );
    }

    if let Some(exclude_pattern) = &exclude {
        let regex = regex::Regex::new(exclude_pattern)
            .with_context(|| format!("Invalid exclude regex pattern: {}", exclude_pattern))?;

        documents.retain(|document| !regex.is_match(document.key()));

        log::info!(
            "After exclude filter '{}': {} document(s)",
            exclude_pattern,
            documents.len()
        );
    }

    Ok(Dataset::new(documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Document;
    use serde_json::Map;

    fn dataset_with_keys(keys: &[&str]) -> Dataset {
        Dataset::new(
            keys.iter()
                .map(|key| Document::new(*key, Map::new()))
                .collect(),
        )
    }

    fn keys(dataset: &Dataset) -> Vec<&str> {
        dataset
            .documents()
            .iter()
            .map(|document| document.key())
            .collect()
    }

    #[test]
    fn test_include_filter_keeps_matching_keys() {
        let dataset = dataset_with_keys(&["02001", "02002", "16001"]);

        let filtered = filter_dataset(dataset, Some("^02".to_string()), None).unwrap();

        assert_eq!(keys(&filtered), vec!["02001", "02002"]);
    }

    #[test]
    fn test_exclude_filter_runs_after_include() {
        let dataset = dataset_with_keys(&["02001", "02002", "16001"]);

        let filtered =
            filter_dataset(dataset, Some("^02".to_string()), Some("002$".to_string())).unwrap();

        assert_eq!(keys(&filtered), vec!["02001"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dataset = dataset_with_keys(&["02001"]);

        let result = filter_dataset(dataset, Some("[".to_string()), None);

        assert!(result.is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_load_store_no_url() {
        // Clear any existing env vars
        unsafe {
            std::env::remove_var("DOCSEED_URL");
            std::env::remove_var("DOCSEED_USERNAME");
            std::env::remove_var("DOCSEED_PASSWORD");
            std::env::remove_var("DOCSEED_APIKEY");
        }

        let result = load_store_from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DOCSEED_URL"));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_store_with_url() {
        unsafe {
            std::env::set_var("DOCSEED_URL", "http://localhost:8529");
            std::env::remove_var("DOCSEED_USERNAME");
            std::env::remove_var("DOCSEED_PASSWORD");
            std::env::remove_var("DOCSEED_APIKEY");
        }

        let result = load_store_from_env();
        assert!(result.is_ok());

        unsafe {
            std::env::remove_var("DOCSEED_URL");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_load_store_invalid_url() {
        unsafe {
            std::env::set_var("DOCSEED_URL", "not-a-valid-url");
        }

        let result = load_store_from_env();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid DOCSEED_URL")
        );

        unsafe {
            std::env::remove_var("DOCSEED_URL");
        }
    }
}
