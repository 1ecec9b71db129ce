use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A single cell value.
///
/// Inputs arrive loosely typed (CSV cells are text, JSON mixes numbers,
/// strings, booleans and nulls), so the engine carries a tagged variant and
/// normalizes at comparison time rather than at ingestion time. Structured
/// values that have no scalar meaning are kept as `Opaque` and only ever
/// compared through their serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Opaque(serde_json::Value),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                // u64 outside f64-exact range; keep the original form
                None => Value::Opaque(serde_json::Value::Number(n)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Opaque(other),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

// ---------------------------------------------------------------------------
// Rows + datasets
// ---------------------------------------------------------------------------

/// One record: column name → value. `BTreeMap` keeps serialized output
/// stable, which the determinism guarantee depends on.
pub type Row = BTreeMap<String, Value>;

/// An ordered, immutable tabular input. Row order is significant: it fixes
/// duplicate-pairing order and is preserved in output indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scalars_map_onto_variants() {
        assert_eq!(Value::from(serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from(serde_json::json!(true)), Value::Bool(true));
        assert_eq!(Value::from(serde_json::json!(42)), Value::Number(42.0));
        assert_eq!(Value::from(serde_json::json!(9.5)), Value::Number(9.5));
        assert_eq!(
            Value::from(serde_json::json!("INV-001")),
            Value::Text("INV-001".to_string())
        );
    }

    #[test]
    fn json_structures_become_opaque() {
        let array = serde_json::json!([1, 2]);
        let object = serde_json::json!({"a": 1});
        assert_eq!(Value::from(array.clone()), Value::Opaque(array));
        assert_eq!(Value::from(object.clone()), Value::Opaque(object));
    }

    #[test]
    fn value_serializes_untagged() {
        let row: Row = [
            ("amount".to_string(), Value::Number(99.5)),
            ("id".to_string(), Value::Text("x".to_string())),
            ("void".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"amount":99.5,"id":"x","void":null}"#);
    }
}
