//! libcurl-backed transport.

use std::time::Duration;

use super::{FetchError, Transport};
use crate::config::HttpConfig;

const MAX_REDIRECTIONS: u32 = 10;

/// One `Easy` handle per request; bodies are buffered in memory.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    http: HttpConfig,
}

impl CurlTransport {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(self.http.follow_redirects)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.useragent(&self.http.user_agent)?;
        // Empty string: advertise every encoding curl can decode; body arrives decoded.
        easy.accept_encoding("")?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.http.timeout_secs))?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            tracing::debug!(url, code, "GET returned non-success status");
            return Err(FetchError::Http(code));
        }
        tracing::trace!(url, bytes = body.len(), "GET completed");
        Ok(body)
    }
}
