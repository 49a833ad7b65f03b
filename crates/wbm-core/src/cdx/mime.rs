//! Eligible content types.

use std::collections::BTreeSet;

use crate::config::DEFAULT_ELIGIBLE_MIMETYPES;

/// Set of mimetypes whose captures are mirrored. Matching is exact, as the
/// index reports them (`text/html`, not `text/html; charset=utf-8`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeFilter {
    allowed: BTreeSet<String>,
}

impl MimeFilter {
    pub fn new<I, S>(mimetypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: mimetypes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, mimetype: &str) -> bool {
        self.allowed.contains(mimetype)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl Default for MimeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ELIGIBLE_MIMETYPES)
    }
}
