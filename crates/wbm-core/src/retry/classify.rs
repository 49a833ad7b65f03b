//! Map transport failures onto retry error kinds.

use super::policy::ErrorKind;
use crate::transport::FetchError;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::Task(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_statuses() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn server_errors_are_retryable() {
        assert_eq!(classify_http_status(502), ErrorKind::Http5xx(502));
        assert_eq!(classify(&FetchError::Http(504)), ErrorKind::Http5xx(504));
    }

    #[test]
    fn missing_captures_are_final() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
        assert_eq!(classify(&FetchError::Task("cancelled".into())), ErrorKind::Other);
    }

    #[test]
    fn curl_errors() {
        let timeout = curl::Error::new(28); // CURLE_OPERATION_TIMEDOUT
        assert_eq!(classify_curl_error(&timeout), ErrorKind::Timeout);
        let refused = curl::Error::new(7); // CURLE_COULDNT_CONNECT
        assert_eq!(classify_curl_error(&refused), ErrorKind::Connection);
        let dns = curl::Error::new(6); // CURLE_COULDNT_RESOLVE_HOST
        assert_eq!(classify(&FetchError::Curl(dns)), ErrorKind::Connection);
        let malformed = curl::Error::new(3); // CURLE_URL_MALFORMAT
        assert_eq!(classify_curl_error(&malformed), ErrorKind::Other);
    }
}
