//! # CLI Command Tests
//!
//! Exercises the handlers behind `enforce check` and `enforce inspect`
//! against contract documents written to a temporary directory.

use std::path::PathBuf;

use enforce_cli::check::{run_check, CheckArgs, ConventionArg};
use enforce_cli::inspect::{build_report, run_inspect, InspectArgs};

const CONTRACTS: &str = r#"
classes:
  Date: ~
  Timestamp: Date
contracts:
  help:
    a: "!string"
    b: { $class: Date }
    c: array
    d: number
  Func:
    id: "!number"
    obj:
      sheetId: "!number"
      something: "!string"
      other: string
"#;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_contracts(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("contracts.yaml");
    std::fs::write(&path, CONTRACTS).unwrap();
    path
}

fn check(contracts: PathBuf, contract: &str, convention: ConventionArg, payload: &str) -> u8 {
    run_check(&CheckArgs {
        contracts,
        contract: contract.to_string(),
        convention,
        payload: Some(payload.to_string()),
        args_file: None,
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_accepts_subclass_instance() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    let code = check(
        contracts,
        "help",
        ConventionArg::Positional,
        r#"["a", {"$class": "Timestamp", "ms": 0}]"#,
    );
    assert_eq!(code, 0);
}

#[test]
fn check_rejects_each_incorrect_positional_payload() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    for payload in [
        "[]",
        "[1, 2]",
        r#"["a", 1]"#,
        r#"["a", {"$class": "Date"}, 2332]"#,
        r#"["a", {"$class": "Date"}, [], "a"]"#,
        r#"["a", null, null, null, "extra"]"#,
    ] {
        assert_eq!(
            check(contracts.clone(), "help", ConventionArg::Positional, payload),
            1,
            "{payload}"
        );
    }
}

#[test]
fn check_named_nulls_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    let code = check(
        contracts,
        "help",
        ConventionArg::Named,
        r#"{"a": null, "b": null, "d": null}"#,
    );
    assert_eq!(code, 0);
}

#[test]
fn check_hybrid_destructured_bag() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    assert_eq!(
        check(
            contracts.clone(),
            "Func",
            ConventionArg::Hybrid,
            r#"[100, {"sheetId": 1.5, "something": "nice"}]"#
        ),
        0
    );
    assert_eq!(
        check(contracts, "Func", ConventionArg::Hybrid, "[200]"),
        1
    );
}

#[test]
fn check_unknown_class_in_payload_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    let result = run_check(&CheckArgs {
        contracts,
        contract: "help".to_string(),
        convention: ConventionArg::Positional,
        payload: Some(r#"["a", {"$class": "Moment"}]"#.to_string()),
        args_file: None,
    });
    assert!(format!("{:#}", result.unwrap_err()).contains("Moment"));
}

#[test]
fn check_missing_payload_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    let result = run_check(&CheckArgs {
        contracts,
        contract: "help".to_string(),
        convention: ConventionArg::Named,
        payload: None,
        args_file: Some(dir.path().join("nope.json")),
    });
    assert!(format!("{:#}", result.unwrap_err()).contains("nope.json"));
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_succeeds_in_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    for json in [false, true] {
        let code = run_inspect(&InspectArgs {
            contracts: contracts.clone(),
            contract: None,
            json,
        })
        .unwrap();
        assert_eq!(code, 0);
    }
}

#[test]
fn inspect_report_preserves_declaration_order() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    let document = enforce_cli::load_document(&contracts).unwrap();
    let report = build_report(&document, Some("help")).unwrap();
    let names: Vec<&str> = report.contracts[0]
        .params
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(report.contracts[0].required, vec!["a".to_string()]);
}

#[test]
fn inspect_unknown_contract_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let contracts = write_contracts(&dir);
    let result = run_inspect(&InspectArgs {
        contracts,
        contract: Some("Missing".to_string()),
        json: false,
    });
    assert!(result.is_err());
}
