//! Per-run error log.
//!
//! One log file per run, named after the run prefix. Every isolated
//! per-file failure lands here as a timestamped line; the scan itself
//! never stops for one. If the log file cannot be opened the run keeps
//! going and entries fall through to stderr only.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct RunLog {
    path: PathBuf,
    file: Option<File>,
}

impl RunLog {
    /// Open the log for appending, creating it if absent. An unopenable
    /// log degrades the run instead of aborting it.
    pub fn create(path: &Path) -> Self {
        let file = match OpenOptions::new().append(true).create(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("could not open run log {}: {e}", path.display());
                None
            }
        };
        Self {
            path: path.to_path_buf(),
            file,
        }
    }

    /// Append one timestamped entry. The message may span lines; the
    /// timestamp prefixes only the first.
    pub fn record(&mut self, message: &str) {
        // Isolated failures stay off the console; the log file is the
        // durable record. Visible under -v only.
        debug!("{message}");
        if let Some(file) = &mut self.file {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
            if let Err(e) = writeln!(file, "{stamp} -- {message}").and_then(|()| file.flush()) {
                warn!("could not write to run log {}: {e}", self.path.display());
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any entry was written (the file grew past zero bytes).
    pub fn has_entries(&self) -> bool {
        self.file
            .as_ref()
            .and_then(|f| f.metadata().ok())
            .is_some_and(|m| m.len() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_timestamped_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut log = RunLog::create(&path);
        log.record("Error reading file: /corpus/a.exe\n\tError info: denied");
        log.record("second entry");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" -- Error reading file: /corpus/a.exe"));
        assert!(lines[1].starts_with("\tError info: denied"));
        assert!(lines[2].contains(" -- second entry"));
    }

    #[test]
    fn test_has_entries_reflects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let mut log = RunLog::create(&path);
        assert!(!log.has_entries());
        log.record("something failed");
        assert!(log.has_entries());
    }

    #[test]
    fn test_unopenable_log_does_not_panic() {
        let mut log = RunLog::create(Path::new("/nonexistent-dir/deep/run.log"));
        log.record("entry with nowhere to go");
        assert!(!log.has_entries());
    }
}
