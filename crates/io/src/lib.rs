//! File ingestion and export.
//!
//! Turns delimited text or JSON into the engine's [`Dataset`] shape and
//! renders reconciliation results back out as CSV.

pub mod csv;
pub mod export;
pub mod json;

use std::fmt;
use std::path::Path;

use tally_engine::Dataset;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum IoError {
    /// File read / decode error.
    Read(String),
    /// Invalid JSON input.
    Json(String),
    /// Malformed delimited text.
    Delimited(String),
    /// Parseable JSON whose shape is not tabular.
    UnsupportedShape(String),
    /// CSV render error.
    Export(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "read error: {msg}"),
            Self::Json(msg) => write!(f, "invalid JSON: {msg}"),
            Self::Delimited(msg) => write!(f, "delimited parse error: {msg}"),
            Self::UnsupportedShape(msg) => write!(f, "unsupported shape: {msg}"),
            Self::Export(msg) => write!(f, "export error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse pasted or loaded text into a dataset: JSON when it looks like JSON,
/// delimited text otherwise. Empty input yields an empty dataset.
pub fn parse_text(text: &str) -> Result<Dataset, IoError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Dataset::default());
    }
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return json::parse_json(trimmed);
    }
    let delimiter = csv::sniff_delimiter(trimmed);
    csv::parse_delimited(trimmed, delimiter)
}

/// Read a file (UTF-8 with Windows-1252 fallback) and parse its contents.
pub fn load_path(path: &Path) -> Result<Dataset, IoError> {
    let content = csv::read_file_as_utf8(path)?;
    parse_text(&content)
}
