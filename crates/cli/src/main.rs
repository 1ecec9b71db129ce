// Tally CLI - headless dataset reconciliation

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use exit_codes::{EXIT_DIFFS, EXIT_INVALID_CONFIG, EXIT_PARSE, EXIT_RUNTIME, EXIT_SUCCESS};
use tally_engine::{reconcile, ReconcileOptions};
use tally_io::export::{mismatches_csv, results_csv};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reconcile two tabular datasets by key")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile dataset A against B (exit 0 = reconciled, exit 1 = differences)
    #[command(after_help = "\
Examples:
  tally run ledger.csv bank.csv --key invoice_id --compare amount
  tally run ledger.csv bank.json --config recon.toml --json
  tally run a.csv b.csv --key vendor,invoice_id --compare amount --tolerance 0.01
  tally run a.csv b.csv --config recon.toml --export results.csv --export-mismatches diffs.csv")]
    Run(RunArgs),

    /// Validate a TOML options file without running
    #[command(after_help = "\
Examples:
  tally validate recon.toml")]
    Validate {
        /// Path to the options file
        config: PathBuf,
    },
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(code: u8, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// Dataset A (CSV/TSV/JSON; format sniffed from content)
    file_a: PathBuf,

    /// Dataset B
    file_b: PathBuf,

    /// TOML options file (instead of --key/--compare flags)
    #[arg(long, conflicts_with_all = ["key", "compare", "tolerance", "key_case_sensitive", "compare_case_insensitive"])]
    config: Option<PathBuf>,

    /// Key column(s). Repeatable; comma-separated accepted.
    #[arg(long, value_name = "COLS")]
    key: Vec<String>,

    /// Compare column(s). Repeatable; comma-separated accepted.
    #[arg(long, value_name = "COLS")]
    compare: Vec<String>,

    /// Maximum absolute numeric difference still treated as equal
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,

    /// Match keys case-sensitively
    #[arg(long)]
    key_case_sensitive: bool,

    /// Compare values case-insensitively
    #[arg(long)]
    compare_case_insensitive: bool,

    /// Print the full result as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Write the full result as JSON to a file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the flat per-row CSV export to a file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Write the expanded per-diff CSV export to a file
    #[arg(long, value_name = "FILE")]
    export_mismatches: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Validate { config } => cmd_validate(config),
    };

    match outcome {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = &err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}

fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let options = load_options(&args)?;

    let dataset_a = tally_io::load_path(&args.file_a).map_err(|e| {
        CliError::new(EXIT_PARSE, format!("cannot load {}: {e}", args.file_a.display()))
    })?;
    let dataset_b = tally_io::load_path(&args.file_b).map_err(|e| {
        CliError::new(EXIT_PARSE, format!("cannot load {}: {e}", args.file_b.display()))
    })?;

    let result = reconcile(&dataset_a, &dataset_b, &options);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::new(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(path) = &args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = &args.export {
        let csv_text = results_csv(&result)
            .map_err(|e| CliError::new(EXIT_RUNTIME, e.to_string()))?;
        std::fs::write(path, csv_text)
            .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot write export: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = &args.export_mismatches {
        let csv_text = mismatches_csv(&result)
            .map_err(|e| CliError::new(EXIT_RUNTIME, e.to_string()))?;
        std::fs::write(path, csv_text)
            .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot write export: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "reconcile: {} A rows vs {} B rows — {} exact, {} mismatched, {} missing in A, {} missing in B, {} invalid",
        s.rows_a,
        s.rows_b,
        s.exact_matches,
        s.mismatches,
        s.missing_in_a,
        s.missing_in_b,
        s.invalid_a + s.invalid_b,
    );
    if s.duplicate_keys_a > 0 || s.duplicate_keys_b > 0 {
        eprintln!(
            "duplicate keys: {} in A, {} in B",
            s.duplicate_keys_a, s.duplicate_keys_b,
        );
    }

    let differs = s.mismatches > 0
        || s.missing_in_a > 0
        || s.missing_in_b > 0
        || s.invalid_a > 0
        || s.invalid_b > 0;
    if differs {
        return Err(CliError::new(EXIT_DIFFS, "differences found"));
    }

    Ok(())
}

fn load_options(args: &RunArgs) -> Result<ReconcileOptions, CliError> {
    if let Some(config_path) = &args.config {
        let config_str = std::fs::read_to_string(config_path).map_err(|e| {
            CliError::new(EXIT_RUNTIME, format!("cannot read config: {e}"))
        })?;
        return ReconcileOptions::from_toml(&config_str)
            .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()));
    }

    let options = ReconcileOptions {
        key_columns: split_columns(&args.key),
        compare_columns: split_columns(&args.compare),
        key_case_insensitive: Some(!args.key_case_sensitive),
        compare_case_insensitive: Some(args.compare_case_insensitive),
        numeric_tolerance: Some(args.tolerance),
    };
    options.validate().map_err(|e| {
        CliError::with_hint(
            EXIT_INVALID_CONFIG,
            e.to_string(),
            "pass --key <column> or --config <file>",
        )
    })?;
    Ok(options)
}

/// Flatten repeatable flags, splitting comma-separated entries.
fn split_columns(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::new(EXIT_RUNTIME, format!("cannot read config: {e}")))?;

    match ReconcileOptions::from_toml(&config_str) {
        Ok(options) => {
            let resolved = options.resolve();
            eprintln!(
                "valid: {} key column(s), {} compare column(s), tolerance {}",
                resolved.key_columns.len(),
                resolved.compare_columns.len(),
                resolved.numeric_tolerance,
            );
            Ok(())
        }
        Err(e) => Err(CliError::new(EXIT_INVALID_CONFIG, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_columns_handles_repeats_and_commas() {
        let values = vec![
            "invoice_id, vendor".to_string(),
            "amount".to_string(),
            " ".to_string(),
        ];
        assert_eq!(
            split_columns(&values),
            vec!["invoice_id", "vendor", "amount"]
        );
    }

    #[test]
    fn flag_options_resolve_case_flags() {
        let args = RunArgs {
            file_a: PathBuf::new(),
            file_b: PathBuf::new(),
            config: None,
            key: vec!["id".into()],
            compare: vec!["amount".into()],
            tolerance: 0.5,
            key_case_sensitive: true,
            compare_case_insensitive: true,
            json: false,
            output: None,
            export: None,
            export_mismatches: None,
        };
        let options = load_options(&args).unwrap();
        let resolved = options.resolve();
        assert!(!resolved.key_case_insensitive);
        assert!(resolved.compare_case_insensitive);
        assert_eq!(resolved.numeric_tolerance, 0.5);
    }

    #[test]
    fn missing_key_columns_are_rejected_with_hint() {
        let args = RunArgs {
            file_a: PathBuf::new(),
            file_b: PathBuf::new(),
            config: None,
            key: vec![],
            compare: vec![],
            tolerance: 0.0,
            key_case_sensitive: false,
            compare_case_insensitive: false,
            json: false,
            output: None,
            export: None,
            export_mismatches: None,
        };
        let err = load_options(&args).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
        assert!(err.hint.is_some());
    }
}
