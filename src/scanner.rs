//! Recursive scan orchestration.
//!
//! Walks the target tree once, feeds every `.exe`/`.dll` candidate through
//! read, digest, dedup-check, header parse, record append. Failures are
//! confined to the file that caused them: the error is written to the run
//! log and the walk moves on.

use crate::arch::Architecture;
use crate::error::FileError;
use crate::hashing::sha256_hex;
use crate::mitigations::MitigationFlags;
use crate::pe_header::HeaderSource;
use crate::progress::ScanProgress;
use crate::record::AnalysisRecord;
use crate::run_log::RunLog;
use crate::store::RecordStore;
use serde::Serialize;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// What the scan did, tallied at the loop boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// Candidate count from the pre-pass, absent when the pre-pass could
    /// not finish cleanly.
    pub candidate_total: Option<usize>,
    /// Candidates the main walk reached.
    pub processed: usize,
    pub records_written: usize,
    pub duplicates: usize,
    pub errors: usize,
}

enum FileDisposition {
    Recorded,
    Duplicate,
}

pub struct ScanOrchestrator<H> {
    headers: H,
}

impl<H: HeaderSource> ScanOrchestrator<H> {
    pub fn new(headers: H) -> Self {
        Self { headers }
    }

    /// Scan `root` and append one record per unique candidate content.
    ///
    /// Never fails as a whole: every per-file error ends up in `log` and
    /// in the returned tally.
    pub fn run(
        &self,
        root: &Path,
        analysis_tag: &str,
        store: &RecordStore,
        log: &mut RunLog,
    ) -> ScanOutcome {
        let candidate_total = count_candidates(root);
        if let Some(total) = candidate_total {
            eprintln!("\n{total} .EXE and .DLL files found in {}\n", root.display());
        }
        let progress = ScanProgress::new(candidate_total);
        let mut outcome = ScanOutcome {
            candidate_total,
            ..ScanOutcome::default()
        };

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log.record(&format!("Error walking directory\n\tError info: {e}"));
                    outcome.errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_candidate(entry.path()) {
                continue;
            }
            outcome.processed += 1;
            match self.process_file(entry.path(), root, analysis_tag, store) {
                Ok(FileDisposition::Recorded) => outcome.records_written += 1,
                Ok(FileDisposition::Duplicate) => outcome.duplicates += 1,
                Err(e) => {
                    log.record(&e.to_string());
                    outcome.errors += 1;
                }
            }
            progress.inc();
        }
        progress.finish();
        outcome
    }

    fn process_file(
        &self,
        path: &Path,
        root: &Path,
        analysis_tag: &str,
        store: &RecordStore,
    ) -> Result<FileDisposition, FileError> {
        let data = std::fs::read(path).map_err(|e| FileError::read(path, e))?;
        let digest = sha256_hex(&data);
        if store
            .contains_digest(&digest)
            .map_err(|e| FileError::store(path, e))?
        {
            debug!("duplicate content, skipping {}", path.display());
            return Ok(FileDisposition::Duplicate);
        }
        let fields = self
            .headers
            .read(&data)
            .map_err(|e| FileError::parse(path, e))?;
        let record = AnalysisRecord {
            analysis_tag: analysis_tag.to_string(),
            root_folder: root.display().to_string(),
            file_path: path.display().to_string(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_extension: canonical_extension(path),
            architecture: Architecture::from_machine(fields.machine),
            file_hash: digest,
            flags: MitigationFlags::decode(fields.dll_characteristics),
        };
        store.append(&record).map_err(|e| FileError::store(path, e))?;
        Ok(FileDisposition::Recorded)
    }
}

/// Selection is by extension alone, case-insensitive. Content that fails
/// to parse as PE is rejected later, per file.
pub fn is_candidate(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe") || ext.eq_ignore_ascii_case("dll"))
}

/// Pre-pass over the tree so the progress bar has a denominator. Returns
/// `None` when any entry errors; the main walk will log the failure.
fn count_candidates(root: &Path) -> Option<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_candidate(entry.path()) => count += 1,
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    Some(count)
}

/// Lowercased extension with its leading dot, as persisted.
fn canonical_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
