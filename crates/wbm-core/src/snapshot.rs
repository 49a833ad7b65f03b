//! Raw snapshot requests against the archive.
//!
//! A [`SnapshotRequest`] pairs the archive URL to fetch with the normalized
//! URL it stands for. The response is always filed under the normalized
//! URL, never under whatever URL the archive answered from.

use crate::cdx::{SelectionMap, Timestamp};
use crate::url_model::NormalizedUrl;

/// Modifier that asks the archive for the capture body as stored, without
/// the replay toolbar or rewritten links.
pub const RAW_MODIFIER: &str = "id_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub url: NormalizedUrl,
    pub timestamp: Timestamp,
    /// `{archive_base_url}/{timestamp}id_/{url}`.
    pub request_url: String,
}

impl SnapshotRequest {
    pub fn new(archive_base_url: &str, url: NormalizedUrl, timestamp: Timestamp) -> Self {
        let request_url = snapshot_url(archive_base_url, &url, &timestamp);
        Self {
            url,
            timestamp,
            request_url,
        }
    }
}

pub fn snapshot_url(archive_base_url: &str, url: &NormalizedUrl, timestamp: &Timestamp) -> String {
    format!(
        "{}/{}{}/{}",
        archive_base_url.trim_end_matches('/'),
        timestamp,
        RAW_MODIFIER,
        url
    )
}

/// One request per selected URL, in selection order.
pub fn plan_requests(archive_base_url: &str, selection: SelectionMap) -> Vec<SnapshotRequest> {
    selection
        .into_iter()
        .map(|(url, timestamp)| SnapshotRequest::new(archive_base_url, url, timestamp))
        .collect()
}
