//! HTTP document store client
//!
//! [`HttpStore`] speaks a small REST protocol: one POST per batch to the
//! target collection's `_commit` endpoint. The store applies the whole
//! request atomically, so a non-success status means nothing in the batch
//! was written.

use super::{Auth, DocumentStore, WriteBatch, WriteOp};
use crate::error::StoreError;
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use url::Url;

/// Client for a document store exposing atomic batch commits over HTTP.
///
/// Endpoints, relative to the base URL:
/// - `POST api/collections/{collection}/_commit` with body
///   `{"writes": [{"key": ..., "fields": {...}, "merge": true}]}`
/// - `GET api/status` for the connectivity and authorization probe
///
/// # Example
/// ```no_run
/// use docstore_seeder::store::{Auth, DocumentStore, HttpStore, WriteBatch};
/// use serde_json::json;
/// use url::Url;
///
/// # async fn example() -> Result<(), docstore_seeder::error::StoreError> {
/// let url = Url::parse("http://localhost:8529").unwrap();
/// let store = HttpStore::try_new(url, Auth::None)?;
///
/// let mut batch = WriteBatch::new("municipios");
/// batch.upsert_merge("m-001", json!({"name": "Albacete"}).as_object().cloned().unwrap());
/// store.commit(&batch).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpStore {
    client: Client,
    url: Url,
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    writes: &'a [WriteOp],
}

impl HttpStore {
    /// Create a store client from a base URL and authentication method.
    ///
    /// Credentials are rendered into default headers once, so every request
    /// carries them.
    pub fn try_new(url: Url, auth: Auth) -> Result<Self, StoreError> {
        let mut headers = reqwest::header::HeaderMap::new();
        match auth {
            Auth::Basic(username, password) => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                headers.append(
                    reqwest::header::AUTHORIZATION,
                    format!("Basic {}", credentials).parse()?,
                );
            }
            Auth::Apikey(apikey) => {
                headers.append(
                    reqwest::header::AUTHORIZATION,
                    format!("ApiKey {}", apikey).parse()?,
                );
            }
            Auth::None => {}
        }
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, url })
    }

    /// The base URL this client talks to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Verify connectivity and authorization against the status endpoint.
    pub async fn test_connection(&self) -> Result<(), StoreError> {
        let url = self.url.join("api/status")?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn commit(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        let url = self
            .url
            .join(&format!("api/collections/{}/_commit", batch.collection()))?;

        log::debug!(
            "Committing {} write(s) to collection '{}'",
            batch.len(),
            batch.collection()
        );

        let response = self
            .client
            .post(url)
            .json(&CommitRequest {
                writes: batch.writes(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected { status, body });
        }

        Ok(())
    }
}

impl std::fmt::Display for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
