//! Wayback Machine CDX index: query building, response parsing and
//! reduction of many captures per URL down to the latest one.
//!
//! Pipeline per domain: [`index_query_url`] → transport GET →
//! [`parse_index`] → [`reduce`] → [`SelectionMap`].

mod mime;
mod parse;
mod query;
mod reduce;

pub use mime::MimeFilter;
pub use parse::{parse_index, IndexRow, Timestamp};
pub use query::{index_query_url, IndexQuery};
pub use reduce::{reduce, select_latest, SelectionMap};

/// Field projection requested from the index; also the optional header row of the response.
pub const CDX_COLUMNS: [&str; 3] = ["timestamp", "original", "mimetype"];
