//! Truth table files and the command-line front end

use clap::Parser;
use simon_mask::cli::{execute, Cli};
use simon_mask::{RecoveryError, TruthTable};
use std::fs;
use tempfile::TempDir;

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args.iter().copied())?;
    let mut out = Vec::new();
    execute(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");

    let table = TruthTable::from_pairs([("00", "10"), ("01", "11"), ("10", "10"), ("11", "11")]).unwrap();
    table.save(&path).unwrap();
    let loaded = TruthTable::load(&path).unwrap();
    assert_eq!(loaded, table);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"01\": \"11\""));
}

#[test]
fn load_rejects_array_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"["00", "01"]"#).unwrap();
    assert!(TruthTable::load(&path).unwrap_err().is_invalid_input());
}

#[test]
fn cli_generate_recover_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("t.json");
    let path_str = path.to_str().unwrap();

    let out = run(&["simon-mask", "generate", "-m", "0110", "--seed", "5", "-o", path_str]).unwrap();
    assert!(out.contains("Wrote 4-bit table"));

    let out = run(&[
        "simon-mask",
        "recover",
        "-t",
        path_str,
        "--seed",
        "6",
        "--max-samples",
        "5000",
        "-v",
    ])
    .unwrap();
    assert!(out.contains("Completed basis:"));
    assert!(out.trim_end().ends_with("Mask: 0110"));

    let out = run(&["simon-mask", "validate", "-t", path_str, "-m", "0110"]).unwrap();
    assert!(out.contains("is a valid period"));

    let err = run(&["simon-mask", "validate", "-t", path_str, "-m", "0001"]).unwrap_err();
    assert!(err.to_string().contains("is not a period"));

    let err = run(&["simon-mask", "validate", "-t", path_str, "-m", "011"]).unwrap_err();
    assert!(err.to_string().contains("has 3 bits"));
}

#[test]
fn cli_recover_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let err = run(&["simon-mask", "recover", "-t", missing.to_str().unwrap()]).unwrap_err();
    assert!(format!("{:#}", err).contains("loading"));
}

#[test]
fn cli_recover_defaults_to_a_sample_cap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("t.json");
    let path_str = path.to_str().unwrap();

    // every sample from a 2-bit table with mask 11 is degenerate
    run(&["simon-mask", "generate", "-m", "11", "--seed", "1", "-o", path_str]).unwrap();
    let err = run(&["simon-mask", "recover", "-t", path_str, "--seed", "2"]).unwrap_err();
    match err.downcast_ref::<RecoveryError>() {
        Some(RecoveryError::Exhausted { samples, rank, needed }) => {
            assert_eq!(*samples, 128);
            assert_eq!(*rank, 0);
            assert_eq!(*needed, 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn cli_recover_constant_table_is_capped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("const.json");
    fs::write(&path, r#"{"000": "01", "001": "01", "010": "01", "011": "01", "100": "01", "101": "01", "110": "01", "111": "01"}"#)
        .unwrap();
    let err = run(&["simon-mask", "recover", "-t", path.to_str().unwrap()]).unwrap_err();
    assert!(format!("{:#}", err).contains("sampling exhausted after 192 samples"));
}
