//! End-to-end pipeline tests over real PE bytes: walk, parse with goblin,
//! dedup through the store, summarize.

mod common;

use common::minimal_pe;
use pescan::arch::{
    IMAGE_FILE_MACHINE_AMD64, IMAGE_FILE_MACHINE_I386, IMAGE_FILE_MACHINE_IA64,
};
use pescan::run_log::RunLog;
use pescan::store::RecordStore;
use pescan::{export, summarize, Architecture, GoblinHeaders, HeaderSource, ScanOrchestrator};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_goblin_reads_machine_and_dll_characteristics() {
    let image = minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0x4140);
    let fields = GoblinHeaders.read(&image).unwrap();
    assert_eq!(fields.machine, IMAGE_FILE_MACHINE_AMD64);
    assert_eq!(fields.dll_characteristics, 0x4140);
}

/// Corpus: A with ASLR+DEP, B with every flag, C byte-identical to A, and
/// a text file misnamed .dll. Two records come out, C is a skip, the
/// misnamed file is one log entry.
#[test]
fn test_scan_records_unique_pe_content_once() {
    let corpus = TempDir::new().unwrap();
    let image_a = minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0x0140);
    fs::write(corpus.path().join("a.exe"), &image_a).unwrap();
    fs::write(
        corpus.path().join("b.exe"),
        minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0xffe0),
    )
    .unwrap();
    fs::write(corpus.path().join("c.exe"), &image_a).unwrap();
    fs::write(corpus.path().join("misnamed.dll"), b"plain text, not a PE").unwrap();

    let artifacts = TempDir::new().unwrap();
    let log_path = artifacts.path().join("run.log");
    let store = RecordStore::open_in_memory().unwrap();
    let mut log = RunLog::create(&log_path);
    let outcome =
        ScanOrchestrator::new(GoblinHeaders).run(corpus.path(), "audit", &store, &mut log);

    assert_eq!(outcome.candidate_total, Some(4));
    assert_eq!(outcome.processed, 4);
    assert_eq!(outcome.records_written, 2);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.errors, 1);

    let records = store.all_records().unwrap();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].file_hash, records[1].file_hash);

    let summary = summarize(&records);
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.exe_count, 2);
    // A lacks CFG, B has everything.
    assert_eq!(summary.unprotected.cfg, 1);
    assert_eq!(summary.unprotected.aslr, 0);
    assert!(summary.risk_files.is_empty());

    let logged = fs::read_to_string(&log_path).unwrap();
    assert!(logged.contains("misnamed.dll"));
    assert!(logged.contains("Error parsing PE image"));
    assert!(!logged.contains("a.exe"));
}

#[test]
fn test_architecture_buckets_across_a_scan() {
    let corpus = TempDir::new().unwrap();
    for (name, machine) in [
        ("i386.exe", IMAGE_FILE_MACHINE_I386),
        ("ia64.exe", IMAGE_FILE_MACHINE_IA64),
        ("amd64.exe", IMAGE_FILE_MACHINE_AMD64),
        ("arm.exe", 0x01c4),
    ] {
        fs::write(corpus.path().join(name), minimal_pe(machine, 0)).unwrap();
    }

    let artifacts = TempDir::new().unwrap();
    let store = RecordStore::open_in_memory().unwrap();
    let mut log = RunLog::create(&artifacts.path().join("run.log"));
    ScanOrchestrator::new(GoblinHeaders).run(corpus.path(), "audit", &store, &mut log);

    let records = store.all_records().unwrap();
    let summary = summarize(&records);
    assert_eq!(summary.i386_count, 1);
    assert_eq!(summary.ia64_count, 1);
    assert_eq!(summary.amd64_count, 1);
    assert_eq!(summary.unknown_arch_count, 1);
    assert!(records
        .iter()
        .any(|r| r.architecture == Architecture::Unknown));
}

#[test]
fn test_sql_export_of_a_scan_replays_cleanly() {
    let corpus = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("a.exe"),
        minimal_pe(IMAGE_FILE_MACHINE_I386, 0x0540),
    )
    .unwrap();
    fs::write(
        corpus.path().join("b.dll"),
        minimal_pe(IMAGE_FILE_MACHINE_AMD64, 0x8000),
    )
    .unwrap();

    let artifacts = TempDir::new().unwrap();
    let store = RecordStore::open_in_memory().unwrap();
    let mut log = RunLog::create(&artifacts.path().join("run.log"));
    ScanOrchestrator::new(GoblinHeaders).run(corpus.path(), "audit", &store, &mut log);

    let records = store.all_records().unwrap();
    let mut script = Vec::new();
    export::write_sql(&mut script, &records).unwrap();

    let replayed = RecordStore::open_in_memory_without_schema().unwrap();
    replayed
        .execute_script(&String::from_utf8(script).unwrap())
        .unwrap();
    assert_eq!(replayed.all_records().unwrap(), records);
}
