use std::fmt;

/// Errors surfaced while loading or validating reconciliation options.
///
/// The engine itself has no failure path: unusable rows are routed to the
/// invalid bucket of the result rather than raised.
#[derive(Debug)]
pub enum OptionsError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Validation error (no key columns, bad tolerance).
    Validation(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "options parse error: {msg}"),
            Self::Validation(msg) => write!(f, "options validation error: {msg}"),
        }
    }
}

impl std::error::Error for OptionsError {}
