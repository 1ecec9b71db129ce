use chrono::SecondsFormat;

use crate::dataset::Value;

/// Canonical textual form of a value, used for display fallbacks, key
/// construction, and string comparison.
///
/// Text is trimmed as-is; numbers and booleans take their shortest Rust
/// textual form; timestamps collapse to a fixed ISO-8601 rendering so two
/// equal instants always compare equal as text. Opaque structures fall back
/// to their JSON serialization (stable key order is not required — the form
/// is only used for display and comparison fallback).
pub fn normalize_string_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Text(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::Millis, true),
        Value::Opaque(v) => serde_json::to_string(v).unwrap_or_else(|_| v.to_string()),
    }
}

/// Tolerant numeric parse — the single parsing policy used everywhere
/// numeric comparison occurs.
///
/// A finite `Number` passes through unchanged. Anything else is stringified,
/// stripped of thousands separators and whitespace, accounting-style
/// `(123.45)` becomes `-123.45`, and remaining characters outside
/// digits/`.`/`+`/`-` are dropped before parsing. `None` for an empty
/// result, a lone sign or decimal point, or a non-finite parse — currency
/// symbols and grouping survive, strings with no numeric content do not.
pub fn to_number_loose(value: &Value) -> Option<f64> {
    if let Value::Number(n) = value {
        if n.is_finite() {
            return Some(*n);
        }
    }
    if matches!(value, Value::Null) {
        return None;
    }

    let text = normalize_string_value(value);
    if text.is_empty() {
        return None;
    }

    let stripped: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let signed = match stripped
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => format!("-{inner}"),
        None => stripped,
    };
    let cleaned: String = signed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
        .collect();

    if cleaned.is_empty() || cleaned == "+" || cleaned == "-" || cleaned == "." {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

/// Key-space normalization: canonical text, optionally case-folded.
/// Used exclusively for key construction.
pub fn normalize_for_key(value: &Value, case_insensitive: bool) -> String {
    let base = normalize_string_value(value);
    if case_insensitive {
        base.to_lowercase()
    } else {
        base
    }
}
