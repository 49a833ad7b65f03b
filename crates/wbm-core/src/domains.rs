//! Domain lists: loading them, and deriving them from lists of site URLs.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

/// Output file name used by [`convert_url_list`] when no path is given.
pub const DEFAULT_DOMAINS_FILE: &str = "domains.txt";

/// Reads one domain per line; surrounding whitespace and blank lines are dropped.
pub fn load_domain_file(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read domain file: {}", path.display()))?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Splits a comma-separated `--domains` value.
pub fn split_domain_arg(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduces a site URL to `scheme://authority`, dropping path, params, query
/// and fragment. Input that is not an absolute URL is only cut at the first
/// `/`, `;`, `?` or `#`.
///
/// `https://x.com/blog?a=1#f` → `https://x.com`
pub fn domain_from_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) if url.has_host() => {
            let mut out = format!("{}://", url.scheme());
            if !url.username().is_empty() {
                out.push_str(url.username());
                if let Some(password) = url.password() {
                    out.push(':');
                    out.push_str(password);
                }
                out.push('@');
            }
            out.push_str(url.host_str().unwrap_or_default());
            if let Some(port) = url.port() {
                out.push_str(&format!(":{port}"));
            }
            out
        }
        _ => {
            let end = raw.find(&['/', ';', '?', '#'][..]).unwrap_or(raw.len());
            raw[..end].to_string()
        }
    }
}

/// Where [`convert_url_list`] writes by default: `domains.txt` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_DOMAINS_FILE)
}

/// Converts a file of site URLs (one per line) into a domain file.
/// Line order is preserved; blank lines are skipped. Returns the output path.
pub fn convert_url_list(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let data = fs::read_to_string(input)
        .with_context(|| format!("failed to read URL list: {}", input.display()))?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    let mut out = String::with_capacity(data.len());
    let mut count = 0usize;
    for line in data.lines().map(str::trim).filter(|l| !l.is_empty()) {
        out.push_str(&domain_from_url(line));
        out.push('\n');
        count += 1;
    }
    fs::write(&output, out)
        .with_context(|| format!("failed to write domain file: {}", output.display()))?;
    tracing::info!(count, output = %output.display(), "converted URL list to domains");
    Ok(output)
}
