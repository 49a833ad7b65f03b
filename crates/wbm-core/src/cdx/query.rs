//! Index request construction.

use super::CDX_COLUMNS;

/// Index request for one domain: every capture under the host, successful
/// ones only, as JSON rows of [`CDX_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub domain: String,
    pub url: String,
}

impl IndexQuery {
    pub fn new(cdx_api_url: &str, domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            url: index_query_url(cdx_api_url, domain),
        }
    }
}

/// Builds the index request URL for `domain`.
///
/// Values are concatenated without percent-encoding. The CDX server rejects
/// encoded reserved characters (`%3A`, `%2C`, `%20`) in these parameters,
/// so `fl=timestamp,original,mimetype` and `filter=statuscode:200` must go
/// out literally.
pub fn index_query_url(cdx_api_url: &str, domain: &str) -> String {
    let fl = CDX_COLUMNS.join(",");
    let params: [(&str, &str); 6] = [
        ("url", domain),
        ("output", "json"),
        ("gzip", "false"),
        ("fl", &fl),
        ("filter", "statuscode:200"),
        ("matchType", "host"),
    ];
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{cdx_api_url}?{query}")
}
