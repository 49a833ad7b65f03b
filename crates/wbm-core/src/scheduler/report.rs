//! Outcome of a mirror run.

use std::path::PathBuf;

use crate::error::{DomainError, UrlError};
use crate::url_model::NormalizedUrl;

#[derive(Debug)]
pub struct UrlFailure {
    pub url: NormalizedUrl,
    pub error: UrlError,
}

/// Result of one domain whose index query succeeded.
#[derive(Debug, Default)]
pub struct DomainReport {
    pub domain: String,
    /// Entries in the selection map.
    pub selected: usize,
    pub written: Vec<PathBuf>,
    /// Dropped by the collision policy; never fetched.
    pub skipped: Vec<NormalizedUrl>,
    pub failures: Vec<UrlFailure>,
}

impl DomainReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<DomainReport>,
    pub failed_domains: Vec<DomainError>,
}

impl RunSummary {
    pub fn report(&self, domain: &str) -> Option<&DomainReport> {
        self.reports.iter().find(|r| r.domain == domain)
    }

    pub fn written(&self) -> usize {
        self.reports.iter().map(|r| r.written.len()).sum()
    }

    pub fn url_failures(&self) -> usize {
        self.reports.iter().map(|r| r.failures.len()).sum()
    }

    /// No domain failed outright. Individual URL failures do not count.
    pub fn is_success(&self) -> bool {
        self.failed_domains.is_empty()
    }
}
