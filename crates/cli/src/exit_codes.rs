//! CLI exit code registry
//!
//! Single source of truth for the `tally` exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success — datasets fully reconciled                  |
//! | 1    | Differences found (mismatch, missing, or invalid)    |
//! | 2    | Usage error (bad arguments; emitted by clap)         |
//! | 3    | Invalid reconciliation options                       |
//! | 4    | Input parse error                                    |
//! | 5    | Runtime error (output write failed)                  |

/// Success — command completed and the datasets reconciled cleanly.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found. Like `diff(1)`, exit 1 means "the inputs differ":
/// any mismatched pair, missing row, or invalid row.
pub const EXIT_DIFFS: u8 = 1;

/// Options rejected (no key columns, bad tolerance, malformed TOML).
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Could not parse an input file into a dataset.
pub const EXIT_PARSE: u8 = 4;

/// The run succeeded but an output could not be written.
pub const EXIT_RUNTIME: u8 = 5;
