//! Portable JSON snapshots for file-based export and import.
//!
//! A snapshot is a pretty-printed JSON array of quote records, the exact
//! shape written to `quotes.json` on export. Import is strict at the top
//! level (anything but an array is rejected) and lenient per element:
//! entries without string `text` and `category` fields are dropped and only
//! show up in the reported total.

use serde_json::Value;

use crate::error::StoreError;
use crate::quote::Quote;
use crate::result::Result;

/// Default file name for exported snapshots.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Outcome of an import: how many elements were accepted out of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Elements that passed shape validation and were appended.
    pub accepted: usize,
    /// Elements present in the snapshot, valid or not.
    pub total: usize,
}

/// Encode a quote sequence as a pretty-printed snapshot.
pub fn encode(quotes: &[Quote]) -> Result<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Decode a snapshot, keeping only elements with string `text` and `category`.
///
/// Fails with [`StoreError::ImportFormat`] when the payload is not a JSON
/// array. Returns the accepted quotes together with the total element count
/// so callers can report "added N of M".
pub fn decode(raw: &str) -> Result<(Vec<Quote>, usize)> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| StoreError::ImportFormat(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(StoreError::ImportFormat(
            "expected a top-level array of quotes".to_string(),
        ));
    };

    let total = items.len();
    let accepted = items
        .into_iter()
        .filter(|item| {
            item.get("text").is_some_and(Value::is_string)
                && item.get("category").is_some_and(Value::is_string)
        })
        .filter_map(|item| serde_json::from_value::<Quote>(item).ok())
        .collect();
    Ok((accepted, total))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_rejects_non_arrays() {
        for raw in ["{\"text\":\"a\"}", "42", "\"quotes\"", "{not json"] {
            match decode(raw) {
                Err(StoreError::ImportFormat(_)) => {}
                other => panic!("expected ImportFormat for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn decode_drops_malformed_elements_but_counts_them() {
        let raw = r#"[{"text":"a","category":"b"},{"foo":1}]"#;
        let (accepted, total) = decode(raw).unwrap();
        assert_eq!(total, 2);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].text, "a");
        assert_eq!(accepted[0].category, "b");
    }

    #[test]
    fn decode_requires_string_typed_fields() {
        let raw = r#"[{"text":1,"category":"b"},{"text":"a","category":null}]"#;
        let (accepted, total) = decode(raw).unwrap();
        assert_eq!(total, 2);
        assert!(accepted.is_empty());
    }

    #[test]
    fn encode_then_decode_preserves_the_sequence() {
        let quotes = vec![
            Quote::new("To be is to do.", "Philosophy", Some("Socrates")),
            Quote::new("Stay hungry.", "Motivation", None),
        ];
        let raw = encode(&quotes).unwrap();
        let (back, total) = decode(&raw).unwrap();
        assert_eq!(total, 2);
        assert_eq!(back, quotes);
    }
}
