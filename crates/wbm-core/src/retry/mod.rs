//! Retry and backoff policy.
//!
//! Classifies transport failures (timeouts, throttling, connection errors,
//! server errors) and decides on capped exponential backoff, so the CLI can
//! wrap any transport in the same policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
