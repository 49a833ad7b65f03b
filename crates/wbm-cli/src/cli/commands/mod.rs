//! CLI command handlers, one per file.

mod completions;
mod domains;
mod fetch;
mod man;

pub use completions::run_completions;
pub use domains::run_domains;
pub use fetch::{run_fetch, FetchArgs};
pub use man::run_man;

#[cfg(test)]
pub(crate) use fetch::{apply_overrides, collect_domains};
