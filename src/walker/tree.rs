//! Directory tree walker
//!
//! Runs on its own thread, feeding one [`FileTask`] per regular file into
//! the queue. Symlinks are not followed and only regular files are
//! emitted. An unreadable subtree is logged and skipped; its siblings are
//! still visited. Dropping the sender when the walk ends closes the queue.

use crate::error::{WalkError, WorkerError};
use crate::walker::queue::{FileQueueSender, FileTask};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Totals from a finished traversal
#[derive(Debug, Clone, Default)]
pub struct TreeWalkStats {
    /// Regular files queued
    pub files_queued: u64,

    /// Entries or subtrees that could not be visited
    pub errors: u64,

    /// Set when the root itself could not be listed and the walk stopped
    pub root_error: Option<WalkError>,
}

/// Check that `root` exists, is a directory and can be listed
///
/// Returns the canonical absolute path to walk from. Failures here are
/// fatal and must be reported before any worker starts.
pub fn validate_root(root: &Path) -> Result<PathBuf, WalkError> {
    let canonical = fs::canonicalize(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WalkError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => WalkError::RootUnreadable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let metadata = fs::metadata(&canonical).map_err(|e| WalkError::RootUnreadable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(WalkError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }

    fs::read_dir(&canonical).map_err(|e| WalkError::RootUnreadable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(canonical)
}

/// Background traversal feeding the file queue
pub struct TreeWalker {
    handle: Option<JoinHandle<TreeWalkStats>>,
}

impl TreeWalker {
    /// Start walking `root` on a new thread
    pub fn spawn(root: PathBuf, sender: FileQueueSender) -> Result<Self, WorkerError> {
        let handle = thread::Builder::new()
            .name("tree-walker".into())
            .spawn(move || walk_tree(&root, sender))
            .map_err(|e| WorkerError::InitFailed {
                id: usize::MAX,
                reason: e.to_string(),
            })?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the traversal to finish
    pub fn join(mut self) -> Result<TreeWalkStats, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked {
                id: usize::MAX,
                message: "Tree walker thread panicked".into(),
            }),
            None => Ok(TreeWalkStats::default()),
        }
    }
}

/// Map a traversal error to a [`WalkError`]
///
/// Depth 0 is the root itself; anything deeper only costs that subtree.
fn classify_walk_error(root: &Path, err: &walkdir::Error) -> WalkError {
    let reason = err.to_string();
    if err.depth() == 0 {
        return WalkError::RootUnreadable {
            path: root.to_path_buf(),
            reason,
        };
    }

    WalkError::EntryFailed {
        path: err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| root.display().to_string()),
        reason,
    }
}

/// Walk `root` and queue every regular file
///
/// Consumes the sender so the queue closes as soon as this returns.
pub fn walk_tree(root: &Path, sender: FileQueueSender) -> TreeWalkStats {
    let mut stats = TreeWalkStats::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = classify_walk_error(root, &e);
                stats.errors += 1;
                if err.is_fatal() {
                    error!(error = %err, "Cannot list root, stopping traversal");
                    stats.root_error = Some(err);
                    break;
                }
                warn!(error = %err, "Skipping unreadable path");
                continue;
            }
        };

        // file_type() comes from lstat here, so symlinks are never regular files
        if !entry.file_type().is_file() {
            continue;
        }

        if sender.send(FileTask::new(entry.into_path())).is_err() {
            warn!("File queue closed before traversal finished");
            break;
        }
        stats.files_queued += 1;
    }

    debug!(
        files = stats.files_queued,
        errors = stats.errors,
        "Traversal finished"
    );

    stats
}
