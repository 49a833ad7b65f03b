//! Failure taxonomy for the mirror pipeline.
//!
//! Errors are scoped to the smallest unit that failed: a [`DomainError`]
//! aborts one domain, a [`UrlError`] aborts one snapshot. Ineligible
//! captures are filtered, never reported as errors.

use std::path::PathBuf;

use crate::transport::FetchError;

/// The index response could not be understood.
#[derive(Debug, thiserror::Error)]
pub enum MalformedIndexResponse {
    #[error("index body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("index row {index} is not a [timestamp, original, mimetype] triple")]
    Row { index: usize },
}

/// Disk-side failure for one snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cannot map URL to a disk path: {url}")]
    UnmappableUrl { url: String },
    #[error("refusing to write outside the output root: {path}")]
    UnsafePath { path: PathBuf },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failure of a whole domain run (before any retrieval was planned).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("index query for {domain} failed: {source}")]
    IndexQuery { domain: String, source: FetchError },
    #[error("malformed index response for {domain}: {source}")]
    MalformedIndex {
        domain: String,
        source: MalformedIndexResponse,
    },
    #[error("domain task for {domain} panicked or was cancelled")]
    Join { domain: String },
}

/// Failure of a single snapshot retrieval or write.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("snapshot task panicked or was cancelled")]
    Join,
}
