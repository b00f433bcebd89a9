//! Filesystem compression control
//!
//! The pipeline only talks to the [`CompressionController`] trait. The
//! platform-bound implementation is selected at compile time:
//!
//! - Linux: toggles the `FS_COMPR_FL` inode flag (honoured by btrfs)
//! - Windows: issues `FSCTL_SET_COMPRESSION` (NTFS)
//! - elsewhere: every call fails with [`FileError::Unsupported`]

use crate::error::FileResult;
use crate::estimate::Decision;
use std::path::Path;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::NativeController;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::NativeController;

#[cfg(not(any(target_os = "linux", windows)))]
mod unsupported;
#[cfg(not(any(target_os = "linux", windows)))]
pub use unsupported::NativeController;

/// Applies a [`Decision`] to a file's compression attribute
///
/// Implementations must be idempotent: applying the decision a file
/// already matches is a no-op. Calls are synchronous and may fail per file
/// without affecting other workers.
pub trait CompressionController: Send + Sync {
    /// Apply `decision` to the file at `path`
    fn apply(&self, path: &Path, decision: Decision) -> FileResult<()>;

    /// Short name for logs and the run header
    fn name(&self) -> &'static str;
}

/// Controller that accepts every decision without touching the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunController;

impl CompressionController for DryRunController {
    fn apply(&self, _path: &Path, _decision: Decision) -> FileResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_accepts_everything() {
        let controller = DryRunController;
        let path = Path::new("/does/not/exist");
        assert!(controller.apply(path, Decision::Enable).is_ok());
        assert!(controller.apply(path, Decision::Disable).is_ok());
        assert_eq!(controller.name(), "dry-run");
    }

    #[test]
    fn test_native_controller_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.txt");
        let controller = NativeController::new();
        assert!(controller.apply(&missing, Decision::Enable).is_err());
    }
}
