//! Latest-capture selection.

use std::collections::btree_map::{self, BTreeMap, Entry};

use super::{parse_index, IndexRow, MimeFilter, Timestamp};
use crate::error::MalformedIndexResponse;
use crate::url_model::{normalize, NormalizedUrl};

/// Latest eligible capture per normalized URL for one domain.
///
/// Built by [`reduce`]; immutable afterwards. Iterates in URL order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMap {
    latest: BTreeMap<NormalizedUrl, Timestamp>,
}

impl SelectionMap {
    pub fn get(&self, url: &NormalizedUrl) -> Option<&Timestamp> {
        self.latest.get(url)
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NormalizedUrl, Timestamp> {
        self.latest.iter()
    }

    /// Fold step: keep the greater timestamp for `url`.
    fn with(mut self, url: NormalizedUrl, timestamp: Timestamp) -> Self {
        match self.latest.entry(url) {
            Entry::Vacant(slot) => {
                slot.insert(timestamp);
            }
            Entry::Occupied(mut slot) => {
                if timestamp > *slot.get() {
                    slot.insert(timestamp);
                }
            }
        }
        self
    }
}

impl IntoIterator for SelectionMap {
    type Item = (NormalizedUrl, Timestamp);
    type IntoIter = btree_map::IntoIter<NormalizedUrl, Timestamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.latest.into_iter()
    }
}

impl<'a> IntoIterator for &'a SelectionMap {
    type Item = (&'a NormalizedUrl, &'a Timestamp);
    type IntoIter = btree_map::Iter<'a, NormalizedUrl, Timestamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.latest.iter()
    }
}

/// Collapses index rows to the latest eligible capture of each normalized URL.
///
/// A max-fold, so the result does not depend on row order.
pub fn reduce<I>(rows: I, filter: &MimeFilter) -> SelectionMap
where
    I: IntoIterator<Item = IndexRow>,
{
    rows.into_iter()
        .filter(|row| {
            let eligible = filter.accepts(&row.mimetype);
            if !eligible {
                tracing::trace!(url = %row.original, mimetype = %row.mimetype, "skipping ineligible capture");
            }
            eligible
        })
        .fold(SelectionMap::default(), |selection, row| {
            selection.with(normalize(&row.original), row.timestamp)
        })
}

/// Parse and reduce one index response body.
pub fn select_latest(
    body: &[u8],
    filter: &MimeFilter,
) -> Result<SelectionMap, MalformedIndexResponse> {
    Ok(reduce(parse_index(body)?, filter))
}
