use crate::dataset::{Row, Value};
use crate::model::{DiffReason, FieldDiff};
use crate::normalize::{normalize_string_value, to_number_loose};

/// Field-by-field comparison of two rows sharing a key. Returns one
/// [`FieldDiff`] per disagreeing compare column, in compare-column order.
///
/// Comparison is two-tier: when both sides parse loosely as numbers the
/// check is strictly numeric with an inclusive tolerance bound; otherwise it
/// falls back to normalized-string equality. A value that is numeric-looking
/// on one side only is compared as text, never coerced.
pub fn diff_rows(
    a_row: &Row,
    b_row: &Row,
    compare_columns: &[String],
    case_insensitive: bool,
    tolerance: f64,
) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    for field in compare_columns {
        let a_value = a_row.get(field).unwrap_or(&Value::Null);
        let b_value = b_row.get(field).unwrap_or(&Value::Null);

        if let (Some(a_num), Some(b_num)) = (to_number_loose(a_value), to_number_loose(b_value)) {
            if (a_num - b_num).abs() > tolerance {
                diffs.push(FieldDiff {
                    field: field.clone(),
                    a: a_value.clone(),
                    b: b_value.clone(),
                    reason: DiffReason::NumericOutsideTolerance,
                });
            }
            continue;
        }

        let a_text = normalize_string_value(a_value);
        let b_text = normalize_string_value(b_value);
        let equal = if case_insensitive {
            a_text.to_lowercase() == b_text.to_lowercase()
        } else {
            a_text == b_text
        };
        if !equal {
            diffs.push(FieldDiff {
                field: field.clone(),
                a: a_value.clone(),
                b: b_value.clone(),
                reason: DiffReason::Different,
            });
        }
    }

    diffs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn numeric_equality_across_formatting() {
        let a = row(&[("amount", Value::Text("100.00".into()))]);
        let b = row(&[("amount", Value::Text("100".into()))]);
        assert!(diff_rows(&a, &b, &cols(&["amount"]), false, 0.0).is_empty());

        let a = row(&[("amount", Value::Text("$1,234.56".into()))]);
        let b = row(&[("amount", Value::Number(1234.56))]);
        assert!(diff_rows(&a, &b, &cols(&["amount"]), false, 0.0).is_empty());
    }

    #[test]
    fn tolerance_is_inclusive() {
        let a = row(&[("amount", Value::Number(100.0))]);
        let b = row(&[("amount", Value::Number(100.25))]);

        // |a-b| == tolerance → no diff
        assert!(diff_rows(&a, &b, &cols(&["amount"]), false, 0.25).is_empty());
        // |a-b| just over tolerance → one diff
        let diffs = diff_rows(&a, &b, &cols(&["amount"]), false, 0.2);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].reason, DiffReason::NumericOutsideTolerance);
    }

    #[test]
    fn numeric_on_one_side_only_compares_as_text() {
        let a = row(&[("amount", Value::Text("100".into()))]);
        let b = row(&[("amount", Value::Text("N/A".into()))]);
        let diffs = diff_rows(&a, &b, &cols(&["amount"]), false, 100.0);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].reason, DiffReason::Different);
    }

    #[test]
    fn case_fold_flag_controls_string_equality() {
        let a = row(&[("vendor", Value::Text("Acme".into()))]);
        let b = row(&[("vendor", Value::Text("acme".into()))]);

        assert!(diff_rows(&a, &b, &cols(&["vendor"]), true, 0.0).is_empty());
        let diffs = diff_rows(&a, &b, &cols(&["vendor"]), false, 0.0);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].reason, DiffReason::Different);
    }

    #[test]
    fn field_absent_from_both_rows_is_equal() {
        let a = row(&[("other", Value::Number(1.0))]);
        let b = row(&[("other", Value::Number(2.0))]);
        assert!(diff_rows(&a, &b, &cols(&["missing"]), false, 0.0).is_empty());
    }

    #[test]
    fn field_absent_from_one_row_differs() {
        let a = row(&[("status", Value::Text("paid".into()))]);
        let b = Row::new();
        let diffs = diff_rows(&a, &b, &cols(&["status"]), false, 0.0);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].b, Value::Null);
    }

    #[test]
    fn diffs_follow_compare_column_order() {
        let a = row(&[
            ("x", Value::Number(1.0)),
            ("y", Value::Number(1.0)),
            ("z", Value::Number(1.0)),
        ]);
        let b = row(&[
            ("x", Value::Number(2.0)),
            ("y", Value::Number(1.0)),
            ("z", Value::Number(3.0)),
        ]);
        let diffs = diff_rows(&a, &b, &cols(&["z", "x", "y"]), false, 0.0);
        let fields: Vec<&str> = diffs.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["z", "x"]);
    }

    #[test]
    fn diff_carries_original_values() {
        let a = row(&[("amount", Value::Text("$100.00".into()))]);
        let b = row(&[("amount", Value::Text("99.50".into()))]);
        let diffs = diff_rows(&a, &b, &cols(&["amount"]), false, 0.0);
        assert_eq!(diffs[0].a, Value::Text("$100.00".into()));
        assert_eq!(diffs[0].b, Value::Text("99.50".into()));
    }

    #[test]
    fn accounting_negatives_compare_numerically() {
        let a = row(&[("net", Value::Text("(500.00)".into()))]);
        let b = row(&[("net", Value::Text("-500".into()))]);
        assert!(diff_rows(&a, &b, &cols(&["net"]), false, 0.0).is_empty());
    }

    #[test]
    fn empty_compare_list_yields_no_diffs() {
        let a = row(&[("amount", Value::Number(1.0))]);
        let b = row(&[("amount", Value::Number(2.0))]);
        assert!(diff_rows(&a, &b, &[], false, 0.0).is_empty());
    }
}
