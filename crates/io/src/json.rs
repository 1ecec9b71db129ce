// JSON import

use std::collections::HashSet;

use tally_engine::dataset::{Dataset, Row, Value};
use tally_engine::normalize::normalize_string_value;

use crate::csv::unique_headers;
use crate::IoError;

/// Parse JSON text into a dataset. Accepts an array of objects, or a 2D
/// array whose first row is the header row. Anything else is an unsupported
/// shape.
pub fn parse_json(text: &str) -> Result<Dataset, IoError> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| IoError::Json(e.to_string()))?;

    let serde_json::Value::Array(items) = parsed else {
        return Err(IoError::UnsupportedShape(
            "provide an array of objects or a 2D array with a header row".into(),
        ));
    };
    if items.is_empty() {
        return Ok(Dataset::default());
    }

    if matches!(items.first(), Some(serde_json::Value::Object(_))) {
        parse_objects(items)
    } else if matches!(items.first(), Some(serde_json::Value::Array(_))) {
        parse_grid(items)
    } else {
        Err(IoError::UnsupportedShape(
            "array elements must be objects or arrays".into(),
        ))
    }
}

/// Array of objects: columns are the first-seen union of keys across all
/// rows.
fn parse_objects(items: Vec<serde_json::Value>) -> Result<Dataset, IoError> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();

    for item in items {
        let serde_json::Value::Object(map) = item else {
            return Err(IoError::UnsupportedShape(
                "mixed array: every element must be an object".into(),
            ));
        };
        let mut row = Row::new();
        for (name, value) in map {
            if seen.insert(name.clone()) {
                columns.push(name.clone());
            }
            row.insert(name, Value::from(value));
        }
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

/// 2D array: first row is headers (stringified, trimmed, de-duplicated),
/// remaining rows map onto them by position.
fn parse_grid(items: Vec<serde_json::Value>) -> Result<Dataset, IoError> {
    let mut grid = items.into_iter();
    let header_cells = match grid.next() {
        Some(serde_json::Value::Array(cells)) => cells,
        _ => return Ok(Dataset::default()),
    };
    let header_texts: Vec<String> = header_cells
        .into_iter()
        .map(|cell| normalize_string_value(&Value::from(cell)))
        .collect();
    let columns = unique_headers(header_texts.iter().map(String::as_str));

    let mut rows = Vec::new();
    for item in grid {
        let serde_json::Value::Array(cells) = item else {
            return Err(IoError::UnsupportedShape(
                "mixed array: every element must be an array".into(),
            ));
        };
        let mut cells = cells.into_iter();
        let mut row = Row::new();
        for column in &columns {
            let value = cells.next().map(Value::from).unwrap_or(Value::Null);
            row.insert(column.clone(), value);
        }
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}
