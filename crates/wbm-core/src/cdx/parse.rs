//! Index response rows.

use serde::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use super::CDX_COLUMNS;
use crate::error::MalformedIndexResponse;

/// Capture time as the index prints it (`YYYYMMDDhhmmss`).
///
/// Compared as a string: all timestamps are fixed-width and zero-padded, so
/// lexicographic order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One capture reported by the index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct IndexRow {
    pub timestamp: Timestamp,
    /// URL as originally captured, query string and all.
    pub original: String,
    pub mimetype: String,
}

impl From<(String, String, String)> for IndexRow {
    fn from((timestamp, original, mimetype): (String, String, String)) -> Self {
        Self {
            timestamp: Timestamp(timestamp),
            original,
            mimetype,
        }
    }
}

impl IndexRow {
    pub fn new(timestamp: &str, original: &str, mimetype: &str) -> Self {
        Self {
            timestamp: Timestamp::new(timestamp),
            original: original.to_string(),
            mimetype: mimetype.to_string(),
        }
    }

    fn is_header(&self) -> bool {
        [
            self.timestamp.as_str(),
            self.original.as_str(),
            self.mimetype.as_str(),
        ] == CDX_COLUMNS
    }
}

/// Parses a JSON index body into rows, dropping a leading header row.
///
/// A blank body and `[]` both mean "no captures". Rows are deserialized one
/// element at a time; the body is never held as a JSON tree.
pub fn parse_index(body: &[u8]) -> Result<Vec<IndexRow>, MalformedIndexResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let mut failed_row = None;
    let mut de = serde_json::Deserializer::from_slice(body);
    let parsed = RowsSeed {
        failed_row: &mut failed_row,
    }
    .deserialize(&mut de)
    .and_then(|rows| de.end().map(|()| rows));

    match parsed {
        Ok(rows) => Ok(rows),
        // A body cut short is malformed as a whole, not at the row it ended in.
        Err(e) => match failed_row {
            Some(index) if !e.is_eof() => Err(MalformedIndexResponse::Row { index }),
            _ => Err(MalformedIndexResponse::Json(e)),
        },
    }
}

/// Top-level array visitor; records the index of the first row that fails.
struct RowsSeed<'a> {
    failed_row: &'a mut Option<usize>,
}

impl<'de, 'a> DeserializeSeed<'de> for RowsSeed<'a> {
    type Value = Vec<IndexRow>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'a> Visitor<'de> for RowsSeed<'a> {
    type Value = Vec<IndexRow>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of [timestamp, original, mimetype] rows")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        let mut index = 0usize;
        loop {
            match seq.next_element::<IndexRow>() {
                Ok(Some(row)) => {
                    if !(index == 0 && row.is_header()) {
                        rows.push(row);
                    }
                }
                Ok(None) => return Ok(rows),
                Err(e) => {
                    *self.failed_row = Some(index);
                    return Err(e);
                }
            }
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_is_dropped() {
        let body = br#"[["timestamp","original","mimetype"],
                        ["20200101000000","http://x.com/","text/html"]]"#;
        let rows = parse_index(body).unwrap();
        assert_eq!(rows, vec![IndexRow::new("20200101000000", "http://x.com/", "text/html")]);
    }

    #[test]
    fn body_without_header() {
        let body = br#"[["20200101","http://x.com/a","text/css"],["20210101","http://x.com/b","image/png"]]"#;
        let rows = parse_index(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp.as_str(), "20200101");
        assert_eq!(rows[1].original, "http://x.com/b");
        assert_eq!(rows[1].mimetype, "image/png");
    }

    #[test]
    fn header_only_in_first_position() {
        let body = br#"[["20200101","http://x.com/a","text/css"],["timestamp","original","mimetype"]]"#;
        assert_eq!(parse_index(body).unwrap().len(), 2);
    }

    #[test]
    fn empty_bodies() {
        assert!(parse_index(b"").unwrap().is_empty());
        assert!(parse_index(b"  \n").unwrap().is_empty());
        assert!(parse_index(b"[]").unwrap().is_empty());
        assert!(parse_index(br#"[["timestamp","original","mimetype"]]"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            parse_index(b"<html>503</html>"),
            Err(MalformedIndexResponse::Json(_))
        ));
        assert!(matches!(
            parse_index(br#"{"rows": []}"#),
            Err(MalformedIndexResponse::Json(_))
        ));
    }

    #[test]
    fn truncated_body_is_malformed_json() {
        let cut = br#"[["20200101","http://x.com/a","text/html"],["2021"#;
        assert!(matches!(
            parse_index(cut),
            Err(MalformedIndexResponse::Json(_))
        ));
        let trailing = br#"[["20200101","http://x.com/a","text/html"]] <html>"#;
        assert!(matches!(
            parse_index(trailing),
            Err(MalformedIndexResponse::Json(_))
        ));
    }

    #[test]
    fn large_body_is_parsed_row_by_row() {
        let rows: Vec<String> = (0..5000)
            .map(|i| format!(r#"["2020{i:010}","http://x.com/p{i}","text/html"]"#))
            .collect();
        let body = format!(r#"[["timestamp","original","mimetype"],{}]"#, rows.join(","));
        let parsed = parse_index(body.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 5000);
        assert_eq!(parsed[4999].original, "http://x.com/p4999");
    }

    #[test]
    fn malformed_rows() {
        let short = br#"[["20200101","http://x.com/a"]]"#;
        assert!(matches!(
            parse_index(short),
            Err(MalformedIndexResponse::Row { index: 0 })
        ));
        let long = br#"[["20200101","http://x.com/a","text/html"],["1","2","3","4"]]"#;
        assert!(matches!(
            parse_index(long),
            Err(MalformedIndexResponse::Row { index: 1 })
        ));
        let numeric = br#"[[20200101,"http://x.com/a","text/html"]]"#;
        assert!(matches!(
            parse_index(numeric),
            Err(MalformedIndexResponse::Row { index: 0 })
        ));
    }

    #[test]
    fn timestamps_order_chronologically() {
        assert!(Timestamp::new("20220101000000") > Timestamp::new("20180101000000"));
        assert!(Timestamp::new("20191231235959") < Timestamp::new("20200101000000"));
    }
}
