//! Mapping of normalized URLs onto mirror files.

use std::path::{Component, Path, PathBuf};

use url::Url;

use super::NormalizedUrl;
use crate::error::StorageError;

const INDEX_FILE: &str = "index.html";
const DEFAULT_EXTENSION: &str = ".html";

/// File for `url` below `root`: `root/host[:port]/path`.
///
/// # Examples
///
/// - `http://x.com/` → `root/x.com/index.html`
/// - `http://x.com/a/b` → `root/x.com/a/b.html`
/// - `http://x.com/a/b.css` → `root/x.com/a/b.css`
///
/// Host and path are read through `url::Url`, so host case, default ports
/// and dot segments are resolved here and not in the key. `http://x.com/a/`
/// and `http://x.com/a/index.html` (or `/a/../b.css` and `/b.css`) share a
/// file; the scheduler's collision policy decides which one is written.
pub fn disk_path(root: &Path, url: &NormalizedUrl) -> Result<PathBuf, StorageError> {
    Ok(root.join(relative_disk_path(url)?))
}

/// Same as [`disk_path`] without the root prefix.
pub fn relative_disk_path(url: &NormalizedUrl) -> Result<PathBuf, StorageError> {
    let unmappable = || StorageError::UnmappableUrl {
        url: url.to_string(),
    };
    let parsed = url.parsed().ok_or_else(unmappable)?;
    let host = host_dir(&parsed).ok_or_else(unmappable)?;

    let mut path = parsed.path().to_string();
    if path.is_empty() {
        path.push('/');
    }
    if path.ends_with('/') {
        path.push_str(INDEX_FILE);
    }
    if Path::new(&path).extension().is_none() {
        path.push_str(DEFAULT_EXTENSION);
    }

    let relative = Path::new(&host).join(path.trim_start_matches('/'));
    ensure_plain_relative(&relative)?;
    Ok(relative)
}

/// Host directory name; keeps an explicit non-default port like the URL authority does.
fn host_dir(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Only plain names are allowed: no root, no `.`/`..`, no prefixes.
fn ensure_plain_relative(path: &Path) -> Result<(), StorageError> {
    let plain = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(())
    } else {
        Err(StorageError::UnsafePath {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_model::normalize;

    fn mapped(url: &str) -> PathBuf {
        disk_path(Path::new("/root"), &normalize(url)).unwrap()
    }

    #[test]
    fn directory_gets_index_html() {
        assert_eq!(mapped("http://x.com/"), PathBuf::from("/root/x.com/index.html"));
        assert_eq!(mapped("http://x.com"), PathBuf::from("/root/x.com/index.html"));
        assert_eq!(
            mapped("http://x.com/blog/"),
            PathBuf::from("/root/x.com/blog/index.html")
        );
    }

    #[test]
    fn extensionless_gets_html() {
        assert_eq!(mapped("http://x.com/a/b"), PathBuf::from("/root/x.com/a/b.html"));
        assert_eq!(mapped("http://x.com/.well"), PathBuf::from("/root/x.com/.well.html"));
    }

    #[test]
    fn extension_is_kept() {
        assert_eq!(mapped("http://x.com/a/b.css"), PathBuf::from("/root/x.com/a/b.css"));
        assert_eq!(
            mapped("https://x.com/img/logo.svg?v=3"),
            PathBuf::from("/root/x.com/img/logo.svg")
        );
        assert_eq!(mapped("http://x.com/a/file."), PathBuf::from("/root/x.com/a/file."));
    }

    #[test]
    fn port_is_part_of_host_dir() {
        assert_eq!(
            mapped("http://x.com:8080/a.js"),
            PathBuf::from("/root/x.com:8080/a.js")
        );
        assert_eq!(mapped("http://x.com:80/a.js"), PathBuf::from("/root/x.com/a.js"));
    }

    #[test]
    fn trailing_slash_and_index_collide() {
        assert_eq!(mapped("http://x.com/a/"), mapped("http://x.com/a/index.html"));
    }

    #[test]
    fn dot_segments_cannot_escape_root() {
        let p = mapped("http://x.com/a/../../../etc/passwd");
        assert_eq!(p, PathBuf::from("/root/x.com/etc/passwd.html"));
    }

    #[test]
    fn key_text_is_resolved_only_for_the_disk() {
        assert_eq!(mapped("http://X.com:80/a/../b.css"), PathBuf::from("/root/x.com/b.css"));
        assert_eq!(mapped("http://x.com/a/../b.css"), mapped("http://x.com/b.css"));
    }

    #[test]
    fn unparseable_url_is_unmappable() {
        let err = disk_path(Path::new("/root"), &normalize("not a url")).unwrap_err();
        assert!(matches!(err, StorageError::UnmappableUrl { .. }));
        let err = disk_path(Path::new("/root"), &normalize("mailto:a@b.c")).unwrap_err();
        assert!(matches!(err, StorageError::UnmappableUrl { .. }));
    }
}
