// Delimited text import

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tally_engine::dataset::{Dataset, Row, Value};

use crate::IoError;

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; higher field counts break ties.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delimiter in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (Windows-1252 fallback for
/// Excel-exported CSVs).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::Read(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| IoError::Read(e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse delimited text with a header row into a dataset.
///
/// Headers are trimmed and de-duplicated. Cells stay text — numeric
/// interpretation happens at comparison time, not at ingestion. Blank lines
/// are skipped, and short records are padded with nulls so every row carries
/// every column.
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Dataset, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header_record = match records.next() {
        Some(record) => record.map_err(|e| IoError::Delimited(e.to_string()))?,
        None => return Ok(Dataset::default()),
    };
    let columns = unique_headers(header_record.iter());

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| IoError::Delimited(e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let mut row = Row::new();
        for (i, column) in columns.iter().enumerate() {
            let value = match record.get(i) {
                Some(field) => Value::Text(field.to_string()),
                None => Value::Null,
            };
            row.insert(column.clone(), value);
        }
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

/// Trim raw headers and disambiguate duplicates by suffixing " (2)", " (3)"…
pub(crate) fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.map(|header| {
        let base = header.trim().to_string();
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let n = *count;
        if n == 1 {
            base
        } else {
            format!("{base} ({n})")
        }
    })
    .collect()
}
