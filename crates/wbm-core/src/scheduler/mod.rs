//! Mirror pipeline scheduler.
//!
//! Per domain: CDX query → reduce to latest captures → plan snapshot
//! requests (collision policy applied) → fetch each → write to disk.
//! Domains run concurrently up to `max_concurrent_domains`; snapshot
//! fetches from all domains share `max_concurrent_fetches` slots.

mod domain;
mod parallel;
mod plan;
mod report;

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::cdx::MimeFilter;
use crate::config::{CollisionPolicy, WbmConfig};
use crate::storage::{SnapshotStore, WriteMode};
use crate::transport::Transport;

pub use plan::{resolve_collisions, Collision, DomainPlan, PlannedSnapshot};
pub use report::{DomainReport, RunSummary, UrlFailure};

/// Pipeline knobs that do not belong to the transport or the store.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub cdx_api_url: String,
    pub archive_base_url: String,
    pub mime_filter: MimeFilter,
    pub collision_policy: CollisionPolicy,
    pub max_concurrent_domains: usize,
    pub max_concurrent_fetches: usize,
}

impl PipelineSettings {
    pub fn from_config(cfg: &WbmConfig) -> Self {
        Self {
            cdx_api_url: cfg.cdx_api_url.clone(),
            archive_base_url: cfg.archive_base_url.clone(),
            mime_filter: cfg.mime_filter(),
            collision_policy: cfg.collision_policy,
            max_concurrent_domains: cfg.max_concurrent_domains,
            max_concurrent_fetches: cfg.max_concurrent_fetches,
        }
    }
}

/// Shared handle to the pipeline; clones share the transport, the store and
/// the fetch slots.
#[derive(Clone)]
pub struct Pipeline {
    transport: Arc<dyn Transport>,
    store: SnapshotStore,
    settings: Arc<PipelineSettings>,
    fetch_slots: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: SnapshotStore,
        settings: PipelineSettings,
    ) -> Self {
        let fetch_slots = Arc::new(Semaphore::new(settings.max_concurrent_fetches.max(1)));
        Self {
            transport,
            store,
            settings: Arc::new(settings),
            fetch_slots,
        }
    }

    /// Pipeline writing to `cfg.output_root` with the configured write mode.
    pub fn from_config(cfg: &WbmConfig, transport: Arc<dyn Transport>) -> Self {
        let store = SnapshotStore::new(&cfg.output_root, WriteMode::from_atomic(cfg.atomic_writes));
        Self::new(transport, store, PipelineSettings::from_config(cfg))
    }
}
