//! CLI for wbm, the Wayback Machine site mirror.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use wbm_core::config;

use commands::{run_completions, run_domains, run_fetch, run_man, FetchArgs};

/// Top-level CLI for wbm.
#[derive(Debug, Parser)]
#[command(name = "wbm", version)]
#[command(about = "Mirror the latest Wayback Machine captures of whole sites", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Mirror the latest eligible capture of every URL of each domain.
    Fetch {
        /// Comma-separated domains, e.g. `x.com,blog.example.org`.
        #[arg(long, value_name = "LIST")]
        domains: Option<String>,

        /// File with one domain per line (default: ./domains.txt when --domains is absent).
        #[arg(long, value_name = "FILE")]
        domain_file: Option<PathBuf>,

        /// Output root; overrides `output_root` from config.
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Domains mirrored concurrently; overrides `max_concurrent_domains`.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Snapshot fetches in flight across all domains; overrides `max_concurrent_fetches`.
        #[arg(long, value_name = "N")]
        fetches: Option<usize>,

        /// Query the index and print the plan without fetching captures.
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert a list of site URLs into a domain file.
    Domains {
        /// File with one site URL per line.
        smallweb: PathBuf,

        /// Output path (default: domains.txt next to the input).
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                domains,
                domain_file,
                root,
                jobs,
                fetches,
                dry_run,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = FetchArgs {
                    domains,
                    domain_file,
                    root,
                    jobs,
                    fetches,
                    dry_run,
                };
                run_fetch(cfg, args).await?;
            }
            CliCommand::Domains { smallweb, out } => run_domains(&smallweb, out.as_deref())?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
