// End-to-end: parse two raw inputs, reconcile, export.

use std::fs;

use tally_engine::model::DiffReason;
use tally_engine::{reconcile, ReconcileOptions};
use tally_io::export::{mismatches_csv, results_csv};
use tally_io::{load_path, parse_text};

const LEDGER_CSV: &str = "\
invoice_id,vendor,amount,status
INV-001,Acme,\"$1,200.00\",paid
INV-002,Globex,(350.00),credit
INV-002,Globex,(350.00),credit
INV-003,Initech,99.95,pending
,NoKey Ltd,10,paid
";

const BANK_JSON: &str = r#"[
    {"invoice_id": "inv-001", "vendor": "ACME", "amount": 1200, "status": "paid"},
    {"invoice_id": "INV-002", "vendor": "Globex", "amount": -350, "status": "credit"},
    {"invoice_id": "INV-004", "vendor": "Umbrella", "amount": "77.10", "status": "paid"}
]"#;

fn options() -> ReconcileOptions {
    ReconcileOptions::from_toml(
        r#"
key_columns = ["invoice_id"]
compare_columns = ["amount", "status"]
"#,
    )
    .unwrap()
}

#[test]
fn csv_against_json_reconciles() {
    let ledger = parse_text(LEDGER_CSV).unwrap();
    let bank = parse_text(BANK_JSON).unwrap();

    assert_eq!(ledger.rows.len(), 5);
    assert_eq!(bank.rows.len(), 3);

    let result = reconcile(&ledger, &bank, &options());
    let s = &result.summary;

    // inv-001 matches across case/currency formatting, the first inv-002
    // pairs exactly, the duplicate inv-002 is surplus, inv-003 is A-only,
    // inv-004 is B-only, and the keyless ledger row is invalid.
    assert_eq!(s.exact_matches, 2);
    assert_eq!(s.mismatches, 0);
    assert_eq!(s.missing_in_b, 2);
    assert_eq!(s.missing_in_a, 1);
    assert_eq!(s.invalid_a, 1);
    assert_eq!(s.duplicate_keys_a, 1);

    let surplus_keys: Vec<&str> = result
        .unpaired
        .missing_in_b
        .iter()
        .map(|u| u.key.as_str())
        .collect();
    assert_eq!(surplus_keys, vec!["inv-002", "inv-003"]);
}

#[test]
fn mismatch_flows_through_to_exports() {
    let ledger = parse_text("invoice_id,amount\nINV-001,100.00\n").unwrap();
    let bank = parse_text("invoice_id,amount\nINV-001,99.50\n").unwrap();

    let result = reconcile(&ledger, &bank, &options());
    assert_eq!(result.summary.mismatches, 1);
    let diff = &result.paired.mismatches[0].diffs[0];
    assert_eq!(diff.field, "amount");
    assert_eq!(diff.reason, DiffReason::NumericOutsideTolerance);

    let flat = results_csv(&result).unwrap();
    assert!(flat.contains("mismatch"));

    let expanded = mismatches_csv(&result).unwrap();
    let mut reader = csv::ReaderBuilder::new().from_reader(expanded.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[0], "inv-001");
    assert_eq!(&record[1], "amount");
    assert_eq!(&record[2], "numeric-outside-tolerance");
}

#[test]
fn files_load_through_encoding_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("ledger.csv");
    let b_path = dir.path().join("bank.json");
    fs::write(&a_path, LEDGER_CSV).unwrap();
    fs::write(&b_path, BANK_JSON).unwrap();

    let ledger = load_path(&a_path).unwrap();
    let bank = load_path(&b_path).unwrap();
    let result = reconcile(&ledger, &bank, &options());
    assert_eq!(result.summary.exact_matches, 2);
}

#[test]
fn semicolon_input_reconciles_against_comma_input() {
    let a = parse_text("id;amount\nX;1,50\n").unwrap();
    let b = parse_text("id,amount\nX,\"150\"\n").unwrap();

    let options = ReconcileOptions::from_toml(
        "key_columns = [\"id\"]\ncompare_columns = [\"amount\"]\n",
    )
    .unwrap();
    let result = reconcile(&a, &b, &options);

    // "1,50" loses its comma under loose numeric parsing → 150
    assert_eq!(result.summary.exact_matches, 1);
}
