use serde::Serialize;

use crate::dataset::{Row, Value};
use crate::options::ResolvedOptions;

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// Which input dataset a row came from. Labeling only — the engine treats
/// both sides identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field diffs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffReason {
    /// Normalized string comparison failed.
    Different,
    /// Both sides parsed numerically and the absolute difference exceeds
    /// the configured tolerance.
    NumericOutsideTolerance,
}

impl DiffReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffReason::Different => "different",
            DiffReason::NumericOutsideTolerance => "numeric-outside-tolerance",
        }
    }
}

impl std::fmt::Display for DiffReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compared field where two paired rows disagree. Carries the original
/// (un-normalized) values from both sides.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub a: Value,
    pub b: Value,
    pub reason: DiffReason,
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// An (A-row, B-row) association sharing a key, with both rows' original
/// positional indices. Created once during pairing, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct PairedRow {
    pub key: String,
    pub a_index: usize,
    pub b_index: usize,
    pub a_row: Row,
    pub b_row: Row,
}

/// A paired row whose compared fields disagree.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchedPair {
    #[serde(flatten)]
    pub pair: PairedRow,
    /// In compare-column order.
    pub diffs: Vec<FieldDiff>,
}

/// A row whose key exists on one side only, or a duplicate-surplus row
/// beyond the count matchable on the other side.
#[derive(Debug, Clone, Serialize)]
pub struct UnpairedRow {
    pub key: String,
    pub side: Side,
    pub index: usize,
    pub row: Row,
}

/// A row excluded from keying entirely.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidRow {
    pub side: Side,
    pub index: usize,
    pub row: Row,
    pub reason: String,
}

/// Diagnostic for a key bound to more than one row position on a side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub key: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Summary + result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rows_a: usize,
    pub rows_b: usize,
    /// Distinct keys per side (invalid rows contribute no key).
    pub keys_a: usize,
    pub keys_b: usize,
    pub matched_pairs: usize,
    pub exact_matches: usize,
    pub mismatches: usize,
    pub missing_in_a: usize,
    pub missing_in_b: usize,
    pub invalid_a: usize,
    pub invalid_b: usize,
    /// Count of keys with duplicates, not of extra rows.
    pub duplicate_keys_a: usize,
    pub duplicate_keys_b: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PairedRows {
    pub exact_matches: Vec<PairedRow>,
    pub mismatches: Vec<MismatchedPair>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnpairedRows {
    pub missing_in_a: Vec<UnpairedRow>,
    pub missing_in_b: Vec<UnpairedRow>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvalidRows {
    pub a: Vec<InvalidRow>,
    pub b: Vec<InvalidRow>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub duplicate_keys_a: Vec<DuplicateKey>,
    pub duplicate_keys_b: Vec<DuplicateKey>,
}

/// Full reconciliation output — a pure function of (A, B, options).
///
/// Every A row lands in exactly one of {exact match, mismatch, missing-in-B,
/// invalid-A}; symmetrically for B.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    pub summary: Summary,
    /// The options actually used, after defaults were applied.
    pub options: ResolvedOptions,
    pub paired: PairedRows,
    pub unpaired: UnpairedRows,
    pub invalid: InvalidRows,
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_reason_textual_forms() {
        assert_eq!(DiffReason::Different.to_string(), "different");
        assert_eq!(
            DiffReason::NumericOutsideTolerance.to_string(),
            "numeric-outside-tolerance"
        );
        assert_eq!(
            serde_json::to_string(&DiffReason::NumericOutsideTolerance).unwrap(),
            "\"numeric-outside-tolerance\""
        );
    }

    #[test]
    fn side_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Side::A).unwrap(), "\"A\"");
        assert_eq!(Side::B.to_string(), "B");
    }

    #[test]
    fn mismatch_flattens_pair_fields() {
        let pair = PairedRow {
            key: "k".into(),
            a_index: 0,
            b_index: 1,
            a_row: Row::new(),
            b_row: Row::new(),
        };
        let mismatch = MismatchedPair { pair, diffs: vec![] };
        let json: serde_json::Value = serde_json::to_value(&mismatch).unwrap();
        assert_eq!(json["key"], "k");
        assert_eq!(json["a_index"], 0);
        assert_eq!(json["b_index"], 1);
        assert!(json["diffs"].as_array().unwrap().is_empty());
    }
}
