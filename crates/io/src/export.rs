// Result export as CSV

use tally_engine::dataset::{Row, Value};
use tally_engine::model::{FieldDiff, ReconciliationResult};

use crate::IoError;

/// Flat export: one line per classified row, in fixed section order (exact,
/// mismatch, missing-in-A, missing-in-B, invalid-A, invalid-B). Row contents
/// and diff lists are embedded as JSON cells; quoting is handled by the CSV
/// writer.
pub fn results_csv(result: &ReconciliationResult) -> Result<String, IoError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_record(
        &mut writer,
        &["status", "key", "note", "diff_count", "diffs", "a_row", "b_row"],
    )?;

    for pair in &result.paired.exact_matches {
        write_record(
            &mut writer,
            &[
                "exact_match",
                &pair.key,
                "",
                "0",
                "",
                &row_json(&pair.a_row)?,
                &row_json(&pair.b_row)?,
            ],
        )?;
    }
    for mismatch in &result.paired.mismatches {
        write_record(
            &mut writer,
            &[
                "mismatch",
                &mismatch.pair.key,
                "",
                &mismatch.diffs.len().to_string(),
                &diffs_json(&mismatch.diffs)?,
                &row_json(&mismatch.pair.a_row)?,
                &row_json(&mismatch.pair.b_row)?,
            ],
        )?;
    }
    for unpaired in &result.unpaired.missing_in_a {
        write_record(
            &mut writer,
            &[
                "missing_in_a",
                &unpaired.key,
                "present only in B",
                "0",
                "",
                "",
                &row_json(&unpaired.row)?,
            ],
        )?;
    }
    for unpaired in &result.unpaired.missing_in_b {
        write_record(
            &mut writer,
            &[
                "missing_in_b",
                &unpaired.key,
                "present only in A",
                "0",
                "",
                &row_json(&unpaired.row)?,
                "",
            ],
        )?;
    }
    for invalid in &result.invalid.a {
        write_record(
            &mut writer,
            &["invalid_a", "", &invalid.reason, "0", "", &row_json(&invalid.row)?, ""],
        )?;
    }
    for invalid in &result.invalid.b {
        write_record(
            &mut writer,
            &["invalid_b", "", &invalid.reason, "0", "", "", &row_json(&invalid.row)?],
        )?;
    }

    finish(writer)
}

/// Expanded mismatch export: one line per field diff.
pub fn mismatches_csv(result: &ReconciliationResult) -> Result<String, IoError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_record(
        &mut writer,
        &["key", "field", "reason", "a_value", "b_value", "a_row_index", "b_row_index"],
    )?;

    for mismatch in &result.paired.mismatches {
        for diff in &mismatch.diffs {
            write_record(
                &mut writer,
                &[
                    &mismatch.pair.key,
                    &diff.field,
                    diff.reason.as_str(),
                    &value_cell(&diff.a)?,
                    &value_cell(&diff.b)?,
                    &mismatch.pair.a_index.to_string(),
                    &mismatch.pair.b_index.to_string(),
                ],
            )?;
        }
    }

    finish(writer)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_record<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    record: &[&str],
) -> Result<(), IoError> {
    writer
        .write_record(record)
        .map_err(|e| IoError::Export(e.to_string()))
}

fn row_json(row: &Row) -> Result<String, IoError> {
    serde_json::to_string(row).map_err(|e| IoError::Export(e.to_string()))
}

fn diffs_json(diffs: &[FieldDiff]) -> Result<String, IoError> {
    serde_json::to_string(diffs).map_err(|e| IoError::Export(e.to_string()))
}

/// Text values export raw; anything else falls back to its JSON form.
fn value_cell(value: &Value) -> Result<String, IoError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Text(s) => Ok(s.clone()),
        other => serde_json::to_string(other).map_err(|e| IoError::Export(e.to_string())),
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, IoError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| IoError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IoError::Export(e.to_string()))
}
