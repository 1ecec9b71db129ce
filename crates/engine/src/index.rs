use std::collections::BTreeMap;

use crate::dataset::{Row, Value};
use crate::model::{DuplicateKey, InvalidRow, Side};
use crate::normalize::normalize_for_key;

/// Separator between normalized key components. Components are expected to
/// be free text; one that itself contains the separator can collide with a
/// neighbouring composite (known accepted edge case).
pub const KEY_SEPARATOR: &str = "|";

// ---------------------------------------------------------------------------
// Key construction
// ---------------------------------------------------------------------------

/// Composite key for one row, or `None` when the row cannot participate in
/// keying — an empty key-column list, or any key component that normalizes
/// to the empty string.
pub fn build_key(row: &Row, key_columns: &[String], case_insensitive: bool) -> Option<String> {
    if key_columns.is_empty() {
        return None;
    }
    let mut parts = Vec::with_capacity(key_columns.len());
    for column in key_columns {
        let normalized =
            normalize_for_key(row.get(column).unwrap_or(&Value::Null), case_insensitive);
        if normalized.is_empty() {
            return None;
        }
        parts.push(normalized);
    }
    Some(parts.join(KEY_SEPARATOR))
}

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

/// Index of one dataset's rows by composite key.
#[derive(Debug, Default)]
pub struct KeyIndex {
    /// key → row positions, bucket contents in input order. The in-bucket
    /// ordering is load-bearing: duplicate keys pair first-with-first.
    pub map: BTreeMap<String, Vec<usize>>,
    pub invalid: Vec<InvalidRow>,
    /// One entry per key bound to more than one position.
    pub duplicates: Vec<DuplicateKey>,
}

pub fn index_rows(
    rows: &[Row],
    key_columns: &[String],
    case_insensitive: bool,
    side: Side,
) -> KeyIndex {
    let mut map: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut invalid = Vec::new();

    for (position, row) in rows.iter().enumerate() {
        match build_key(row, key_columns, case_insensitive) {
            Some(key) => map.entry(key).or_default().push(position),
            None => invalid.push(InvalidRow {
                side,
                index: position,
                row: row.clone(),
                reason: "missing one or more key fields".to_string(),
            }),
        }
    }

    let duplicates = map
        .iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(key, positions)| DuplicateKey {
            key: key.clone(),
            count: positions.len(),
        })
        .collect();

    KeyIndex {
        map,
        invalid,
        duplicates,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
