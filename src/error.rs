//! Error taxonomy.
//!
//! Two tiers: the record store failing to open is the run's only fatal
//! error; everything that can go wrong for an individual file is a
//! [`FileError`], caught at the scan loop boundary, written to the run log,
//! and never allowed past the file it concerns.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to obtain the PE header fields from file bytes.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("not a valid PE image: {0}")]
    Malformed(String),

    #[error("PE image has no optional header")]
    MissingOptionalHeader,
}

/// Record store failures. Only `Open` is fatal to a run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open record store: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("record store query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// An isolated per-file failure: the path plus the stage that failed.
///
/// The display form matches the run-log line format, with the error detail
/// indented on a continuation line.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Error reading file: {path}\n\tError info: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing PE image: {path}\n\tError info: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: HeaderError,
    },

    #[error("Error recording file: {path}\n\tError info: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

impl FileError {
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, source: HeaderError) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn store(path: &Path, source: StoreError) -> Self {
        Self::Store {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileError::Read { path, .. }
            | FileError::Parse { path, .. }
            | FileError::Store { path, .. } => path,
        }
    }
}
