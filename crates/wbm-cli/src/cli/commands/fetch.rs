//! `wbm fetch` – mirror domains from the archive.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wbm_core::config::WbmConfig;
use wbm_core::domains::{load_domain_file, split_domain_arg, DEFAULT_DOMAINS_FILE};
use wbm_core::scheduler::{DomainReport, Pipeline, RunSummary};
use wbm_core::transport::{CurlTransport, RetryingTransport, Transport};

/// Flags of `wbm fetch`, after clap parsing.
#[derive(Debug, Default)]
pub struct FetchArgs {
    pub domains: Option<String>,
    pub domain_file: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub fetches: Option<usize>,
    pub dry_run: bool,
}

pub async fn run_fetch(mut cfg: WbmConfig, args: FetchArgs) -> Result<()> {
    apply_overrides(&mut cfg, &args);
    let domains = collect_domains(&args)?;
    if domains.is_empty() {
        bail!("no domains to mirror");
    }
    tracing::info!(
        count = domains.len(),
        root = %cfg.output_root.display(),
        "starting mirror run"
    );

    let transport: Arc<dyn Transport> = Arc::new(RetryingTransport::new(
        CurlTransport::new(cfg.http.clone()),
        cfg.retry_policy(),
    ));
    let pipeline = Pipeline::from_config(&cfg, transport);

    if args.dry_run {
        return dry_run(&pipeline, &domains).await;
    }

    let summary = pipeline.run_domains(&domains).await;
    print_summary(&summary);
    if !summary.is_success() {
        bail!(
            "{} of {} domain(s) failed",
            summary.failed_domains.len(),
            domains.len()
        );
    }
    Ok(())
}

/// Command-line flags win over config values.
pub(crate) fn apply_overrides(cfg: &mut WbmConfig, args: &FetchArgs) {
    if let Some(root) = &args.root {
        cfg.output_root = root.clone();
    }
    if let Some(jobs) = args.jobs {
        cfg.max_concurrent_domains = jobs.max(1);
    }
    if let Some(fetches) = args.fetches {
        cfg.max_concurrent_fetches = fetches.max(1);
    }
}

/// `--domains` and `--domain-file` combined, in that order, without duplicates.
/// With neither flag, `./domains.txt` is read.
pub(crate) fn collect_domains(args: &FetchArgs) -> Result<Vec<String>> {
    let mut all = Vec::new();
    if let Some(list) = &args.domains {
        all.extend(split_domain_arg(list));
    }
    match &args.domain_file {
        Some(path) => all.extend(load_domain_file(path)?),
        None if args.domains.is_none() => {
            all.extend(load_domain_file(Path::new(DEFAULT_DOMAINS_FILE))?)
        }
        None => {}
    }

    let mut seen = std::collections::HashSet::new();
    all.retain(|d| seen.insert(d.clone()));
    Ok(all)
}

async fn dry_run(pipeline: &Pipeline, domains: &[String]) -> Result<()> {
    let mut failed = 0usize;
    for domain in domains {
        match pipeline.plan_domain(domain).await {
            Ok(plan) => {
                println!(
                    "{}: {} selected, {} to fetch, {} collision(s), {} unmappable",
                    plan.domain,
                    plan.selected,
                    plan.snapshots.len(),
                    plan.collisions.len(),
                    plan.unmappable.len()
                );
                for s in &plan.snapshots {
                    println!(
                        "  {} {} -> {}",
                        s.request.timestamp,
                        s.request.url,
                        s.path.display()
                    );
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} domain(s) failed", failed, domains.len());
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{:<32} {:>8} {:>8} {:>8} {:>8}",
        "DOMAIN", "SELECTED", "WRITTEN", "SKIPPED", "FAILED"
    );
    for r in &summary.reports {
        print_report(r);
    }
    for e in &summary.failed_domains {
        eprintln!("{}", e);
    }
    println!(
        "{} file(s) written, {} URL failure(s), {} failed domain(s)",
        summary.written(),
        summary.url_failures(),
        summary.failed_domains.len()
    );
}

fn print_report(r: &DomainReport) {
    println!(
        "{:<32} {:>8} {:>8} {:>8} {:>8}",
        r.domain,
        r.selected,
        r.written.len(),
        r.skipped.len(),
        r.failures.len()
    );
    for f in &r.failures {
        println!("  failed {}: {}", f.url, f.error);
    }
}
