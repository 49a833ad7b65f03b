//! URL modeling and disk path derivation.
//!
//! Collapses captured URLs to their path identity (no params, query or
//! fragment) and maps that identity onto a file below the output root.

mod disk_path;
mod normalize;

pub use disk_path::{disk_path, relative_disk_path};
pub use normalize::{normalize, NormalizedUrl};
