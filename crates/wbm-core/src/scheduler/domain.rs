//! One domain: index query, reduction, snapshot fetch and write.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::plan::{build_plan, DomainPlan};
use super::report::{DomainReport, UrlFailure};
use super::Pipeline;
use crate::cdx::{select_latest, IndexQuery};
use crate::error::{DomainError, UrlError};
use crate::snapshot::SnapshotRequest;
use crate::storage::SnapshotStore;
use crate::transport::{FetchError, Transport};

impl Pipeline {
    /// Queries the index for `domain` and plans its snapshots without fetching them.
    pub async fn plan_domain(&self, domain: &str) -> Result<DomainPlan, DomainError> {
        let query = IndexQuery::new(&self.settings.cdx_api_url, domain);
        tracing::info!(domain, url = %query.url, "querying index");

        let body = get_blocking(Arc::clone(&self.transport), query.url)
            .await
            .map_err(|source| DomainError::IndexQuery {
                domain: domain.to_string(),
                source,
            })?;
        let selection = select_latest(&body, &self.settings.mime_filter).map_err(|source| {
            DomainError::MalformedIndex {
                domain: domain.to_string(),
                source,
            }
        })?;
        tracing::info!(domain, selected = selection.len(), "index reduced");

        Ok(build_plan(domain, selection, &self.settings, &self.store))
    }

    /// Mirrors `domain`: plan, then fetch and write every planned snapshot.
    ///
    /// Only a failed or malformed index query fails the domain; a failed
    /// snapshot is recorded in the report and the rest carry on.
    pub async fn run_domain(&self, domain: &str) -> Result<DomainReport, DomainError> {
        let DomainPlan {
            domain,
            selected,
            snapshots,
            collisions,
            unmappable,
        } = self.plan_domain(domain).await?;

        let mut report = DomainReport {
            domain,
            selected,
            written: Vec::with_capacity(snapshots.len()),
            skipped: collisions.into_iter().flat_map(|c| c.skipped).collect(),
            failures: unmappable,
        };

        let mut pending = Vec::with_capacity(snapshots.len());
        let mut join_set = JoinSet::new();
        for snapshot in snapshots {
            let url = snapshot.request.url.clone();
            pending.push(url.clone());
            let transport = Arc::clone(&self.transport);
            let store = self.store.clone();
            let slots = Arc::clone(&self.fetch_slots);
            join_set.spawn(async move {
                let result = fetch_snapshot(transport, store, slots, snapshot.request).await;
                (url, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            let (url, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!(domain = %report.domain, "snapshot task failed: {}", e);
                    continue;
                }
            };
            if let Some(i) = pending.iter().position(|p| *p == url) {
                pending.swap_remove(i);
            }
            match result {
                Ok(path) => report.written.push(path),
                Err(error) => {
                    tracing::warn!(domain = %report.domain, url = %url, "snapshot failed: {}", error);
                    report.failures.push(UrlFailure { url, error });
                }
            }
        }
        // Tasks that never reported back.
        report
            .failures
            .extend(pending.into_iter().map(|url| UrlFailure {
                url,
                error: UrlError::Join,
            }));

        tracing::info!(
            domain = %report.domain,
            selected = report.selected,
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "domain finished"
        );
        Ok(report)
    }
}

async fn get_blocking(transport: Arc<dyn Transport>, url: String) -> Result<Vec<u8>, FetchError> {
    tokio::task::spawn_blocking(move || transport.get(&url))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
}

/// Waits for a fetch slot, then downloads and writes one snapshot on the blocking pool.
async fn fetch_snapshot(
    transport: Arc<dyn Transport>,
    store: SnapshotStore,
    slots: Arc<Semaphore>,
    request: SnapshotRequest,
) -> Result<PathBuf, UrlError> {
    let _permit = slots.acquire_owned().await.map_err(|_| UrlError::Join)?;
    tokio::task::spawn_blocking(move || -> Result<PathBuf, UrlError> {
        tracing::debug!(url = %request.url, timestamp = %request.timestamp, "fetching snapshot");
        let body = transport.get(&request.request_url)?;
        Ok(store.write(&request.url, &body)?)
    })
    .await
    .map_err(|_| UrlError::Join)?
}
