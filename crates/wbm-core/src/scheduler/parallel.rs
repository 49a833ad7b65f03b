//! Run many domains concurrently.
//!
//! Keeps up to `max_concurrent_domains` domains in flight; when one
//! finishes, the next queued domain is started until the queue is empty.

use tokio::task::JoinSet;

use super::report::RunSummary;
use super::Pipeline;
use crate::error::DomainError;

impl Pipeline {
    /// Mirrors every domain in `domains`. A failing domain is recorded in the
    /// summary and never stops the others.
    pub async fn run_domains(&self, domains: &[String]) -> RunSummary {
        let max_concurrent = self.settings.max_concurrent_domains.max(1);
        let mut queue = domains.iter().cloned();
        let mut pending: Vec<String> = Vec::new();
        let mut join_set = JoinSet::new();
        let mut summary = RunSummary::default();

        loop {
            while join_set.len() < max_concurrent {
                let Some(domain) = queue.next() else {
                    break;
                };
                pending.push(domain.clone());
                let pipeline = self.clone();
                join_set.spawn(async move {
                    let result = pipeline.run_domain(&domain).await;
                    (domain, result)
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            let (domain, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!("domain task failed: {}", e);
                    continue;
                }
            };
            if let Some(i) = pending.iter().position(|p| *p == domain) {
                pending.swap_remove(i);
            }
            match result {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    tracing::warn!(domain = %domain, "domain failed: {}", e);
                    summary.failed_domains.push(e);
                }
            }
        }

        summary
            .failed_domains
            .extend(pending.into_iter().map(|domain| DomainError::Join { domain }));
        summary
    }
}
