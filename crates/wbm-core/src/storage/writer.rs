//! Whole-file snapshot writer.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{TEMP_PREFIX, TEMP_SUFFIX};
use crate::error::StorageError;
use crate::url_model::{disk_path, NormalizedUrl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Temp file in the target directory, then rename over the final path.
    #[default]
    Atomic,
    /// Truncate and write the final path in place.
    Direct,
}

impl WriteMode {
    pub fn from_atomic(atomic: bool) -> Self {
        if atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Direct
        }
    }
}

/// Writes snapshot bodies below `root`, one directory per host.
///
/// Cheap to clone and safe to share across blocking tasks; writes to
/// different paths never interfere. Two writes to the same path leave
/// whichever finished last.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    mode: WriteMode,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    pub fn path_for(&self, url: &NormalizedUrl) -> Result<PathBuf, StorageError> {
        disk_path(&self.root, url)
    }

    /// Writes `body` as the snapshot of `url`, overwriting any previous file.
    /// Returns the final path.
    pub fn write(&self, url: &NormalizedUrl, body: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(url)?;
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let written = match self.mode {
            WriteMode::Atomic => write_atomic(dir, &path, body),
            WriteMode::Direct => fs::write(&path, body),
        };
        written.map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(url = %url, path = %path.display(), bytes = body.len(), "snapshot written");
        Ok(path)
    }
}

fn write_atomic(dir: &Path, final_path: &Path, body: &[u8]) -> io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    tmp.write_all(body)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // tempfile creates 0600; mirror files should be readable like any other output.
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(final_path).map_err(|e| e.error)?;
    Ok(())
}
