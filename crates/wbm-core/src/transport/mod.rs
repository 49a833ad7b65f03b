//! HTTP transport used for index queries and snapshot retrieval.
//!
//! The pipeline only sees the [`Transport`] trait, so tests can serve canned
//! bodies and deployments can swap in another client. [`CurlTransport`] is
//! the libcurl implementation; [`RetryingTransport`] adds backoff on top of
//! any transport.

mod curl_transport;
mod retrying;

use std::sync::Arc;

pub use curl_transport::CurlTransport;
pub use retrying::RetryingTransport;

/// Failure of one GET. Retry decisions are made by [`RetryingTransport`],
/// never by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Blocking task running the transfer panicked or was cancelled.
    #[error("transfer task failed: {0}")]
    Task(String),
}

/// Blocking HTTP GET returning the full response body.
///
/// Called from `spawn_blocking`; implementations may block the thread.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url)
    }
}
