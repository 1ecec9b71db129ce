use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::diff::diff_rows;
use crate::index::index_rows;
use crate::model::{
    Diagnostics, InvalidRows, MismatchedPair, PairedRow, PairedRows, ReconciliationResult, Side,
    Summary, UnpairedRow, UnpairedRows,
};
use crate::options::ReconcileOptions;

/// Reconcile two datasets under the given options.
///
/// Never fails: rows that cannot form a key land in the invalid buckets, and
/// every remaining row is classified as exactly one of exact match, mismatch,
/// or missing-on-one-side. Output ordering is fixed — keys are visited in
/// lexicographic order, duplicate keys pair strictly by input order — so
/// repeated runs over the same inputs produce identical results.
pub fn reconcile(
    dataset_a: &Dataset,
    dataset_b: &Dataset,
    options: &ReconcileOptions,
) -> ReconciliationResult {
    let resolved = options.resolve();

    let index_a = index_rows(
        &dataset_a.rows,
        &resolved.key_columns,
        resolved.key_case_insensitive,
        Side::A,
    );
    let index_b = index_rows(
        &dataset_b.rows,
        &resolved.key_columns,
        resolved.key_case_insensitive,
        Side::B,
    );

    let mut exact_matches = Vec::new();
    let mut mismatches = Vec::new();
    let mut missing_in_a = Vec::new();
    let mut missing_in_b = Vec::new();

    // Sorted union of both key spaces fixes output ordering independent of
    // input order.
    let keys: BTreeSet<&String> = index_a.map.keys().chain(index_b.map.keys()).collect();

    for key in keys {
        let a_positions = index_a.map.get(key).map(Vec::as_slice).unwrap_or_default();
        let b_positions = index_b.map.get(key).map(Vec::as_slice).unwrap_or_default();

        // Duplicate keys pair strictly by input order, first-with-first.
        let pairs = a_positions.len().min(b_positions.len());
        for p in 0..pairs {
            let a_index = a_positions[p];
            let b_index = b_positions[p];
            let a_row = &dataset_a.rows[a_index];
            let b_row = &dataset_b.rows[b_index];

            let diffs = diff_rows(
                a_row,
                b_row,
                &resolved.compare_columns,
                resolved.compare_case_insensitive,
                resolved.numeric_tolerance,
            );

            let pair = PairedRow {
                key: key.clone(),
                a_index,
                b_index,
                a_row: a_row.clone(),
                b_row: b_row.clone(),
            };
            if diffs.is_empty() {
                exact_matches.push(pair);
            } else {
                mismatches.push(MismatchedPair { pair, diffs });
            }
        }

        // Surplus positions beyond the pairable count are individually
        // reported missing on the other side, tagged with the shared key.
        for &index in &a_positions[pairs..] {
            missing_in_b.push(UnpairedRow {
                key: key.clone(),
                side: Side::A,
                index,
                row: dataset_a.rows[index].clone(),
            });
        }
        for &index in &b_positions[pairs..] {
            missing_in_a.push(UnpairedRow {
                key: key.clone(),
                side: Side::B,
                index,
                row: dataset_b.rows[index].clone(),
            });
        }
    }

    let summary = Summary {
        rows_a: dataset_a.rows.len(),
        rows_b: dataset_b.rows.len(),
        keys_a: index_a.map.len(),
        keys_b: index_b.map.len(),
        matched_pairs: exact_matches.len() + mismatches.len(),
        exact_matches: exact_matches.len(),
        mismatches: mismatches.len(),
        missing_in_a: missing_in_a.len(),
        missing_in_b: missing_in_b.len(),
        invalid_a: index_a.invalid.len(),
        invalid_b: index_b.invalid.len(),
        duplicate_keys_a: index_a.duplicates.len(),
        duplicate_keys_b: index_b.duplicates.len(),
    };

    ReconciliationResult {
        summary,
        options: resolved,
        paired: PairedRows {
            exact_matches,
            mismatches,
        },
        unpaired: UnpairedRows {
            missing_in_a,
            missing_in_b,
        },
        invalid: InvalidRows {
            a: index_a.invalid,
            b: index_b.invalid,
        },
        diagnostics: Diagnostics {
            duplicate_keys_a: index_a.duplicates,
            duplicate_keys_b: index_b.duplicates,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
