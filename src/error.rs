//! Error types for compact-walker
//!
//! This module defines the error hierarchy that covers:
//! - Per-file errors (open, read, estimate, apply)
//! - Traversal errors (fatal at the root, non-fatal below it)
//! - Configuration errors
//! - Worker thread errors
//!
//! Per-file errors never escape a worker: they are turned into a
//! [`FileOutcome`] and recorded in the run statistics.

use crate::estimate::Decision;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for compact-walker
#[derive(Error, Debug)]
pub enum CompactError {
    /// Per-file errors
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Errors raised while evaluating or updating a single file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    /// Permission denied
    #[error("Permission denied: '{path}'")]
    PermissionDenied { path: String },

    /// Path not found (may have been removed during the walk)
    #[error("Path not found: '{path}'")]
    NotFound { path: String },

    /// Failed to open or stat the file
    #[error("Failed to open '{path}': {reason}")]
    OpenFailed { path: String, reason: String },

    /// Failed while reading file contents
    #[error("Failed to read '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    /// The in-memory compressor failed to accept input or finish
    #[error("Compression engine failed for '{path}': {reason}")]
    Engine { path: String, reason: String },

    /// File is larger than the configured size ceiling
    #[error("File '{path}' is {size} bytes, above the {limit} byte ceiling")]
    TooLarge { path: String, size: u64, limit: u64 },

    /// The compression controller rejected the decision
    #[error("Failed to {decision} compression for '{path}': {reason}")]
    ApplyFailed {
        path: String,
        decision: Decision,
        reason: String,
    },

    /// The host filesystem or platform has no per-file compression control
    #[error("Compression control is not supported for '{path}': {reason}")]
    Unsupported { path: String, reason: String },
}

impl FileError {
    /// Classify an I/O error raised while opening or stat-ing `path`
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            io::ErrorKind::NotFound => FileError::NotFound { path },
            _ => FileError::OpenFailed {
                path,
                reason: err.to_string(),
            },
        }
    }

    /// Check if this error means the file was deliberately left alone
    /// rather than failed
    pub fn is_skip(&self) -> bool {
        matches!(self, FileError::TooLarge { .. })
    }

    /// Returns the path associated with this error
    pub fn path(&self) -> &str {
        match self {
            FileError::PermissionDenied { path }
            | FileError::NotFound { path }
            | FileError::OpenFailed { path, .. }
            | FileError::ReadFailed { path, .. }
            | FileError::Engine { path, .. }
            | FileError::TooLarge { path, .. }
            | FileError::ApplyFailed { path, .. }
            | FileError::Unsupported { path, .. } => path,
        }
    }
}

/// Directory traversal errors
#[derive(Error, Debug, Clone)]
pub enum WalkError {
    /// Root path does not exist
    #[error("Root path not found: '{path}'")]
    RootNotFound { path: PathBuf },

    /// Root path exists but is not a directory
    #[error("Root path '{path}' is not a directory")]
    RootNotDirectory { path: PathBuf },

    /// Root directory cannot be listed
    #[error("Cannot read root directory '{path}': {reason}")]
    RootUnreadable { path: PathBuf, reason: String },

    /// A subtree or entry could not be visited
    #[error("Failed to visit '{path}': {reason}")]
    EntryFailed { path: String, reason: String },
}

impl WalkError {
    /// Check if this error must abort the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WalkError::EntryFailed { .. })
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// A zero size ceiling would skip every file
    #[error("Invalid size ceiling {limit}: must be greater than zero")]
    InvalidSizeCeiling { limit: u64 },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Thread could not be spawned
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },
}

/// Result type alias for CompactError
pub type Result<T> = std::result::Result<T, CompactError>;

/// Result type alias for FileError
pub type FileResult<T> = std::result::Result<T, FileError>;

/// Represents the outcome of evaluating a single file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Compression was enabled; `bytes_saved` is the estimated saving
    Compressed { path: String, bytes_saved: i64 },

    /// Compression was disabled
    Decompressed { path: String },

    /// Deliberately not evaluated
    Skipped { path: String, reason: String },

    /// Estimation or apply failed
    Failed { path: String, error: FileError },
}

impl FileOutcome {
    /// Build the outcome for a file whose pipeline stopped with `error`
    pub fn from_error(error: FileError) -> Self {
        let path = error.path().to_string();
        if error.is_skip() {
            FileOutcome::Skipped {
                path,
                reason: error.to_string(),
            }
        } else {
            FileOutcome::Failed { path, error }
        }
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &str {
        match self {
            FileOutcome::Compressed { path, .. } => path,
            FileOutcome::Decompressed { path } => path,
            FileOutcome::Skipped { path, .. } => path,
            FileOutcome::Failed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classification() {
        let path = Path::new("/data/file.bin");

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(
            FileError::from_io(path, &denied),
            FileError::PermissionDenied {
                path: "/data/file.bin".into()
            }
        );

        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            FileError::from_io(path, &missing),
            FileError::NotFound { .. }
        ));

        let other = io::Error::new(io::ErrorKind::Other, "boom");
        assert!(matches!(
            FileError::from_io(path, &other),
            FileError::OpenFailed { .. }
        ));
    }

    #[test]
    fn test_outcome_from_error() {
        let too_large = FileError::TooLarge {
            path: "/big".into(),
            size: 10,
            limit: 5,
        };
        assert!(matches!(
            FileOutcome::from_error(too_large),
            FileOutcome::Skipped { .. }
        ));

        let denied = FileError::PermissionDenied {
            path: "/secret".into(),
        };
        let outcome = FileOutcome::from_error(denied.clone());
        assert_eq!(outcome.path(), "/secret");
        assert_eq!(
            outcome,
            FileOutcome::Failed {
                path: "/secret".into(),
                error: denied
            }
        );
    }

    #[test]
    fn test_error_conversion() {
        let file_err = FileError::NotFound {
            path: "/missing".into(),
        };
        let err: CompactError = file_err.into();
        assert!(matches!(err, CompactError::File(_)));

        let walk_err = WalkError::RootNotFound {
            path: PathBuf::from("/nope"),
        };
        assert!(walk_err.is_fatal());
        let entry_err = WalkError::EntryFailed {
            path: "/a/b".into(),
            reason: "denied".into(),
        };
        assert!(!entry_err.is_fatal());
    }
}
