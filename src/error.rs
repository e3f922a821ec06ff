//! Error taxonomy for the bulk-load pipeline
//!
//! `ReadError` and `ConfigError` halt a run before any store mutation.
//! `CommitError` halts further batches and carries the exact committed-so-far
//! count, so the caller always knows which prefix of the dataset is durable.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding a dataset source.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not well-formed JSON.
    #[error("failed to parse dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The source did not decode to an ordered sequence of documents.
    #[error("dataset {path} does not contain a sequence of documents")]
    NotASequence { path: PathBuf },

    /// An element of the sequence is not a JSON object.
    #[error("document at index {index} is not an object")]
    NotAnObject { index: usize },

    /// An element has no usable key: absent, not a string, or empty.
    #[error("document at index {index} has no usable '{field}' key")]
    MissingKey { index: usize, field: String },
}

/// Invalid loader configuration, rejected before any work begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Batch capacity must allow at least one write per commit.
    #[error("batch capacity must be at least 1")]
    ZeroCapacity,

    /// The target collection name is empty.
    #[error("collection name must not be empty")]
    EmptyCollection,
}

/// Errors surfaced by a document store while committing a batch.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never completed: connection, timeout, TLS.
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store rejected commit ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// A request path did not join onto the base URL.
    #[error("invalid store url: {0}")]
    Url(#[from] url::ParseError),

    /// Credentials could not be rendered into a request header.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] reqwest::header::InvalidHeaderValue),
}

/// A batch commit failed; every batch before `batch_index` is durable.
#[derive(Debug, Error)]
#[error("batch {batch_index} failed after {committed} document(s) were committed: {source}")]
pub struct CommitError {
    /// 0-based index of the batch that failed.
    pub batch_index: usize,
    /// Documents durably committed before the failure (a dataset prefix).
    pub committed: usize,
    #[source]
    pub source: StoreError,
}

/// Any error a bulk load can end with.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}
