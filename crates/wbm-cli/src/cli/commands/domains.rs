//! `wbm domains` – turn a list of site URLs into a domain file.

use anyhow::Result;
use std::path::Path;
use wbm_core::domains::convert_url_list;

pub fn run_domains(smallweb: &Path, out: Option<&Path>) -> Result<()> {
    let written = convert_url_list(smallweb, out)?;
    println!("Wrote {}", written.display());
    Ok(())
}
