//! Snapshot planning for one domain: selection → requests → disk paths,
//! with colliding paths resolved by the configured policy.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::report::UrlFailure;
use super::PipelineSettings;
use crate::cdx::SelectionMap;
use crate::config::CollisionPolicy;
use crate::snapshot::{plan_requests, SnapshotRequest};
use crate::storage::SnapshotStore;
use crate::url_model::NormalizedUrl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSnapshot {
    pub request: SnapshotRequest,
    /// Where the body will land; recomputed from `request.url` at write time.
    pub path: PathBuf,
}

/// Several selected URLs mapping to one file (`/a/` vs `/a/index.html`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub path: PathBuf,
    pub kept: Vec<NormalizedUrl>,
    pub skipped: Vec<NormalizedUrl>,
}

/// Everything decided before the first snapshot is fetched.
#[derive(Debug)]
pub struct DomainPlan {
    pub domain: String,
    /// Entries in the selection map.
    pub selected: usize,
    pub snapshots: Vec<PlannedSnapshot>,
    pub collisions: Vec<Collision>,
    /// Selected URLs that have no valid disk path.
    pub unmappable: Vec<UrlFailure>,
}

/// Groups snapshots by disk path and applies `policy` to groups of two or more.
///
/// `PreferLatest` keeps the newest capture (ties go to the greater URL) and
/// skips the rest; `LastWriteWins` keeps them all. Output is in path order.
pub fn resolve_collisions(
    planned: Vec<PlannedSnapshot>,
    policy: CollisionPolicy,
) -> (Vec<PlannedSnapshot>, Vec<Collision>) {
    let mut by_path: BTreeMap<PathBuf, Vec<PlannedSnapshot>> = BTreeMap::new();
    for snapshot in planned {
        by_path.entry(snapshot.path.clone()).or_default().push(snapshot);
    }

    let mut kept = Vec::with_capacity(by_path.len());
    let mut collisions = Vec::new();
    for (path, mut group) in by_path {
        if group.len() == 1 {
            kept.append(&mut group);
            continue;
        }
        match policy {
            CollisionPolicy::PreferLatest => {
                group.sort_by(|a, b| {
                    (&a.request.timestamp, &a.request.url).cmp(&(&b.request.timestamp, &b.request.url))
                });
                let Some(winner) = group.pop() else {
                    continue;
                };
                collisions.push(Collision {
                    path,
                    kept: vec![winner.request.url.clone()],
                    skipped: group.into_iter().map(|s| s.request.url).collect(),
                });
                kept.push(winner);
            }
            CollisionPolicy::LastWriteWins => {
                collisions.push(Collision {
                    path,
                    kept: group.iter().map(|s| s.request.url.clone()).collect(),
                    skipped: Vec::new(),
                });
                kept.append(&mut group);
            }
        }
    }
    (kept, collisions)
}

pub(crate) fn build_plan(
    domain: &str,
    selection: SelectionMap,
    settings: &PipelineSettings,
    store: &SnapshotStore,
) -> DomainPlan {
    let selected = selection.len();
    let mut mapped = Vec::with_capacity(selected);
    let mut unmappable = Vec::new();
    for request in plan_requests(&settings.archive_base_url, selection) {
        match store.path_for(&request.url) {
            Ok(path) => mapped.push(PlannedSnapshot { request, path }),
            Err(e) => {
                tracing::warn!(domain, url = %request.url, "skipping snapshot: {}", e);
                unmappable.push(UrlFailure {
                    url: request.url,
                    error: e.into(),
                });
            }
        }
    }

    let (snapshots, collisions) = resolve_collisions(mapped, settings.collision_policy);
    for c in &collisions {
        tracing::warn!(
            domain,
            path = %c.path.display(),
            kept = %join_urls(&c.kept),
            skipped = %join_urls(&c.skipped),
            policy = ?settings.collision_policy,
            "several URLs map to one mirror file"
        );
    }

    DomainPlan {
        domain: domain.to_string(),
        selected,
        snapshots,
        collisions,
        unmappable,
    }
}

fn join_urls(urls: &[NormalizedUrl]) -> String {
    urls.iter()
        .map(NormalizedUrl::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdx::Timestamp;
    use crate::url_model::{disk_path, normalize};
    use std::path::Path;

    fn planned(url: &str, ts: &str) -> PlannedSnapshot {
        let url = normalize(url);
        PlannedSnapshot {
            path: disk_path(Path::new("/out"), &url).unwrap(),
            request: SnapshotRequest::new("https://web.archive.org/web", url, Timestamp::new(ts)),
        }
    }

    #[test]
    fn distinct_paths_pass_through() {
        let input = vec![planned("http://x.com/a.css", "2020"), planned("http://x.com/", "2021")];
        let (kept, collisions) = resolve_collisions(input, CollisionPolicy::PreferLatest);
        assert_eq!(kept.len(), 2);
        assert!(collisions.is_empty());
    }

    #[test]
    fn prefer_latest_keeps_newest_capture() {
        let input = vec![
            planned("http://x.com/a/", "20230101"),
            planned("http://x.com/a/index.html", "20200101"),
        ];
        let (kept, collisions) = resolve_collisions(input, CollisionPolicy::PreferLatest);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].request.url.as_str(), "http://x.com/a/");
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].path, PathBuf::from("/out/x.com/a/index.html"));
        assert_eq!(collisions[0].skipped, vec![normalize("http://x.com/a/index.html")]);
    }

    #[test]
    fn prefer_latest_breaks_ties_by_url() {
        let input = vec![
            planned("http://x.com/a/index.html", "20200101"),
            planned("http://x.com/a/", "20200101"),
        ];
        let (kept, _) = resolve_collisions(input, CollisionPolicy::PreferLatest);
        assert_eq!(kept[0].request.url.as_str(), "http://x.com/a/index.html");
    }

    #[test]
    fn last_write_wins_keeps_everything() {
        let input = vec![
            planned("http://x.com/a/", "20230101"),
            planned("http://x.com/a/index.html", "20200101"),
        ];
        let (kept, collisions) = resolve_collisions(input, CollisionPolicy::LastWriteWins);
        assert_eq!(kept.len(), 2);
        assert_eq!(collisions[0].kept.len(), 2);
        assert!(collisions[0].skipped.is_empty());
    }
}
