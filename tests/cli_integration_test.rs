//! Full binary runs: report on stdout, artifacts in the working
//! directory, store removed at exit.

mod common;

use common::minimal_pe;
use pescan::arch::{IMAGE_FILE_MACHINE_AMD64, IMAGE_FILE_MACHINE_I386};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn artifact_names(dir: &TempDir) -> Vec<String> {
    fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_run_prints_report_and_discards_store() {
    let corpus = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("a.exe"),
        minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0x0140),
    )
    .unwrap();
    let workdir = TempDir::new().unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("pescan")
        .unwrap()
        .current_dir(workdir.path())
        .args([corpus.path().to_str().unwrap(), "audit"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("RESULTS:"))
        .stdout(predicate::str::contains("Total files analyzed : 1"))
        .stdout(predicate::str::contains("Export data? Press:"))
        .stderr(predicate::str::contains("Errors exported to"));

    let names = artifact_names(&workdir);
    assert!(names
        .iter()
        .any(|n| n.starts_with("audit__") && n.ends_with(".log")));
    assert!(!names.iter().any(|n| n.ends_with(".db")));
    assert!(!names.iter().any(|n| n.ends_with(".csv")));
    assert!(!names.iter().any(|n| n.ends_with(".sql")));
}

#[test]
fn test_csv_export_lands_next_to_the_log() {
    let corpus = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("lib.dll"),
        minimal_pe(IMAGE_FILE_MACHINE_I386, 0xffe0),
    )
    .unwrap();
    let workdir = TempDir::new().unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("pescan")
        .unwrap()
        .current_dir(workdir.path())
        .args([corpus.path().to_str().unwrap(), "audit"])
        .write_stdin("c\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exporting to CSV"));

    let names = artifact_names(&workdir);
    let csv = names
        .iter()
        .find(|n| n.ends_with(".csv"))
        .expect("csv artifact");
    let content = fs::read_to_string(workdir.path().join(csv)).unwrap();
    assert!(content.starts_with("\"id_analysis\""));
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("lib.dll"));
}

#[test]
fn test_json_mode_emits_machine_readable_report_without_prompt() {
    let corpus = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("a.exe"),
        minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0),
    )
    .unwrap();
    let workdir = TempDir::new().unwrap();

    #[allow(deprecated)]
    let output = assert_cmd::Command::cargo_bin("pescan")
        .unwrap()
        .current_dir(workdir.path())
        .args(["--json", corpus.path().to_str().unwrap(), "audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Export data?").not())
        .get_output()
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["total_records"], 1);
    assert_eq!(report["scan"]["records_written"], 1);
    // No active guard at all: the lone file is on the risk list.
    assert_eq!(report["summary"]["risk_files"].as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_menu_option_reprompts() {
    let corpus = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("a.exe"),
        minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0),
    )
    .unwrap();
    let workdir = TempDir::new().unwrap();

    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("pescan")
        .unwrap()
        .current_dir(workdir.path())
        .args([corpus.path().to_str().unwrap(), "audit"])
        .write_stdin("x\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Please, enter a valid option [[n]/[s]/[c]]",
        ));
}

#[test]
fn test_missing_arguments_print_usage() {
    #[allow(deprecated)]
    assert_cmd::Command::cargo_bin("pescan")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
