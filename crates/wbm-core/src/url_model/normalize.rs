//! Path-identity normalization of captured URLs.

use std::fmt;
use url::Url;

/// A captured URL with params, query and fragment removed.
///
/// Ordering is plain string ordering, which keeps selection output and
/// reports deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-parse for host/path access. `None` when the input never parsed as an absolute URL.
    pub fn parsed(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes `raw` to scheme + host + path by cutting `#fragment`,
/// `?query` and the last path segment's `;params` off the text.
///
/// Everything before the cut is kept byte for byte: host case, ports, dot
/// segments and escapes are not touched, so the result is still the URL the
/// archive captured. Never fails, and
/// `normalize(normalize(u).as_str()) == normalize(u)`.
pub fn normalize(raw: &str) -> NormalizedUrl {
    let end = raw.find('#').unwrap_or(raw.len());
    let raw = &raw[..end];
    let end = raw.find('?').unwrap_or(raw.len());
    let raw = &raw[..end];

    let path_at = path_start(raw);
    let (head, path) = raw.split_at(path_at);
    match strip_params(path) {
        Some(path) => NormalizedUrl(format!("{head}{path}")),
        None => NormalizedUrl(raw.to_string()),
    }
}

/// Byte offset where the path begins: after `scheme://authority` when
/// present, otherwise the whole string is path.
fn path_start(raw: &str) -> usize {
    match raw.find("://") {
        Some(i) => {
            let authority = i + 3;
            raw[authority..]
                .find('/')
                .map_or(raw.len(), |j| authority + j)
        }
        None => 0,
    }
}

/// Drops `;params` from the last path segment; `None` if there are none.
fn strip_params(path: &str) -> Option<String> {
    let (dir, last) = match path.rfind('/') {
        Some(i) => path.split_at(i + 1),
        None => ("", path),
    };
    let cut = last.find(';')?;
    Some(format!("{}{}", dir, &last[..cut]))
}
