use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

// ---------------------------------------------------------------------------
// Caller-supplied options
// ---------------------------------------------------------------------------

/// Reconciliation options as supplied by the caller. Unset flags take their
/// defaults during [`ReconcileOptions::resolve`].
///
/// `key_columns` and `compare_columns` are evaluated independently and may
/// overlap.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconcileOptions {
    /// Ordered columns whose normalized values jointly form the join key.
    pub key_columns: Vec<String>,
    /// Ordered columns checked for value agreement once two rows are paired.
    #[serde(default)]
    pub compare_columns: Vec<String>,
    #[serde(default)]
    pub key_case_insensitive: Option<bool>,
    #[serde(default)]
    pub compare_case_insensitive: Option<bool>,
    #[serde(default)]
    pub numeric_tolerance: Option<f64>,
}

impl ReconcileOptions {
    /// Parse options from TOML and validate them.
    pub fn from_toml(input: &str) -> Result<Self, OptionsError> {
        let options: ReconcileOptions =
            toml::from_str(input).map_err(|e| OptionsError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Caller-side gate. The engine accepts any options — an empty key list
    /// classifies every row as invalid, an empty compare list makes every
    /// pair an exact match — but an empty key list is almost never intended,
    /// so it is rejected here. An empty compare list stays legal
    /// (presence-only reconciliation).
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.key_columns.is_empty() {
            return Err(OptionsError::Validation(
                "at least one key column is required".into(),
            ));
        }
        if let Some(tolerance) = self.numeric_tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(OptionsError::Validation(format!(
                    "numeric_tolerance must be a non-negative finite number, got {tolerance}"
                )));
            }
        }
        Ok(())
    }

    /// Apply defaults, producing the fully-populated configuration the
    /// engine consumes and echoes back in its result.
    pub fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            key_columns: self.key_columns.clone(),
            compare_columns: self.compare_columns.clone(),
            key_case_insensitive: self.key_case_insensitive.unwrap_or(true),
            compare_case_insensitive: self.compare_case_insensitive.unwrap_or(false),
            numeric_tolerance: self.numeric_tolerance.unwrap_or(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

/// Options after defaults are applied. Built once per run, never mutated,
/// echoed in the result for auditability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOptions {
    pub key_columns: Vec<String>,
    pub compare_columns: Vec<String>,
    pub key_case_insensitive: bool,
    pub compare_case_insensitive: bool,
    pub numeric_tolerance: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
