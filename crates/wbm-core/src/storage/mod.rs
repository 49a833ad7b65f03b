//! Snapshot files on disk.
//!
//! Each snapshot is written whole: either straight into its final path or,
//! by default, into a sibling temp file that is renamed over the final path
//! so readers never see a half-written file.

mod writer;

pub use writer::{SnapshotStore, WriteMode};

/// Suffix of in-flight temp files (`.wbm-XXXXXX.part`), next to their final path.
pub const TEMP_SUFFIX: &str = ".part";
pub(crate) const TEMP_PREFIX: &str = ".wbm-";
