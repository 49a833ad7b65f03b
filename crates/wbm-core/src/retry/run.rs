//! Retry loop: run a closure until success or policy says stop.

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::transport::FetchError;

/// Runs `f` until it succeeds or `policy` gives up, sleeping the backoff
/// between attempts. Blocks the calling thread.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, url: &str, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(url, attempt, ?delay, error = %e, "retrying request");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}
