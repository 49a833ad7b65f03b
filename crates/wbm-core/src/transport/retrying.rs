//! Transport decorator that retries transient failures.

use super::{FetchError, Transport};
use crate::retry::{run_with_retry, RetryPolicy};

/// Retries timeouts, connection errors, throttling and 5xx per `policy`.
/// Everything else (404, malformed URL, ...) fails on the first attempt.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T: Transport> Transport for RetryingTransport<T> {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        run_with_retry(&self.policy, url, || self.inner.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fails with the queued statuses, then succeeds.
    struct Flaky {
        failures: Mutex<Vec<u32>>,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(mut statuses: Vec<u32>) -> Self {
            statuses.reverse();
            Self {
                failures: Mutex::new(statuses),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl Transport for Flaky {
        fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failures.lock().unwrap().pop() {
                Some(code) => Err(FetchError::Http(code)),
                None => Ok(b"ok".to_vec()),
            }
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_throttling_and_server_errors() {
        let transport = RetryingTransport::new(Flaky::new(vec![503, 429, 500]), fast_policy(5));
        assert_eq!(transport.get("http://x/").unwrap(), b"ok");
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn not_found_is_not_retried() {
        let transport = RetryingTransport::new(Flaky::new(vec![404]), fast_policy(5));
        assert!(matches!(transport.get("http://x/"), Err(FetchError::Http(404))));
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let transport =
            RetryingTransport::new(Flaky::new(vec![502, 502, 502, 502]), fast_policy(3));
        assert!(matches!(transport.get("http://x/"), Err(FetchError::Http(502))));
        assert_eq!(transport.inner.calls.load(Ordering::SeqCst), 3);
    }
}
