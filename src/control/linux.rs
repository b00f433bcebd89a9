//! Linux compression control via inode flags
//!
//! btrfs compresses new extents of files carrying `FS_COMPR_FL`. Clearing
//! the flag and setting `FS_NOCOMP_FL` stops compression for the file.
//!
//! Filesystems that honour `FS_COMPR_FL` but reject `FS_NOCOMP_FL` answer
//! the disable request with `EOPNOTSUPP` or `EINVAL`. The disable is then
//! retried with only `FS_COMPR_FL` cleared.

use super::CompressionController;
use crate::error::{FileError, FileResult};
use crate::estimate::Decision;
use std::fs::OpenOptions;
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::{debug, trace};

/// Compress file contents
const FS_COMPR_FL: libc::c_int = 0x0000_0004;

/// Do not compress file contents
const FS_NOCOMP_FL: libc::c_int = 0x0000_0400;

/// Native controller backed by `FS_IOC_GETFLAGS`/`FS_IOC_SETFLAGS`
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeController;

impl NativeController {
    pub fn new() -> Self {
        Self
    }
}

/// Compute the inode flags that express `decision`
fn target_flags(current: libc::c_int, decision: Decision) -> libc::c_int {
    match decision {
        Decision::Enable => (current | FS_COMPR_FL) & !FS_NOCOMP_FL,
        Decision::Disable => (current & !FS_COMPR_FL) | FS_NOCOMP_FL,
    }
}

/// Flags to retry with when the filesystem rejects `target_flags`
///
/// Only a disable has a weaker form. `None` when there is nothing left to
/// retry.
fn fallback_flags(current: libc::c_int, decision: Decision) -> Option<libc::c_int> {
    match decision {
        Decision::Enable => None,
        Decision::Disable => Some(current & !FS_COMPR_FL),
    }
}

fn set_flags(fd: libc::c_int, flags: libc::c_int) -> io::Result<()> {
    // SAFETY: the caller keeps fd open; the kernel reads one int
    let ret = unsafe { libc::ioctl(fd, libc::FS_IOC_SETFLAGS, &flags as *const libc::c_int) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

impl CompressionController for NativeController {
    fn apply(&self, path: &Path, decision: Decision) -> FileResult<()> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOFOLLOW)
            .open(path)
            .map_err(|e| FileError::from_io(path, &e))?;
        let fd = file.as_raw_fd();

        let mut current: libc::c_int = 0;
        // SAFETY: fd is open for the lifetime of `file`; the kernel writes one int
        let ret =
            unsafe { libc::ioctl(fd, libc::FS_IOC_GETFLAGS, &mut current as *mut libc::c_int) };
        if ret != 0 {
            return Err(ioctl_error(path, decision, io::Error::last_os_error()));
        }

        let wanted = target_flags(current, decision);
        if wanted == current {
            trace!(path = %path.display(), %decision, "Flags already match");
            return Ok(());
        }

        match set_flags(fd, wanted) {
            Ok(()) => Ok(()),
            Err(err) if matches!(err.raw_os_error(), Some(libc::EOPNOTSUPP | libc::EINVAL)) => {
                let Some(weaker) = fallback_flags(current, decision) else {
                    return Err(ioctl_error(path, decision, err));
                };
                debug!(path = %path.display(), %decision, "FS_NOCOMP_FL rejected, clearing FS_COMPR_FL only");
                if weaker == current {
                    return Ok(());
                }
                set_flags(fd, weaker).map_err(|e| ioctl_error(path, decision, e))
            }
            Err(err) => Err(ioctl_error(path, decision, err)),
        }
    }

    fn name(&self) -> &'static str {
        "linux-inode-flags"
    }
}

fn ioctl_error(path: &Path, decision: Decision, err: io::Error) -> FileError {
    let path_str = path.display().to_string();
    match err.raw_os_error() {
        Some(libc::ENOTTY) | Some(libc::EOPNOTSUPP) | Some(libc::EINVAL) => {
            FileError::Unsupported {
                path: path_str,
                reason: err.to_string(),
            }
        }
        Some(libc::EPERM) | Some(libc::EACCES) => FileError::PermissionDenied { path: path_str },
        _ => FileError::ApplyFailed {
            path: path_str,
            decision,
            reason: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_flags() {
        let immutable = 0x10;

        let on = target_flags(immutable | FS_NOCOMP_FL, Decision::Enable);
        assert_eq!(on, immutable | FS_COMPR_FL);

        let off = target_flags(on, Decision::Disable);
        assert_eq!(off, immutable | FS_NOCOMP_FL);
    }

    #[test]
    fn test_target_flags_idempotent() {
        for decision in [Decision::Enable, Decision::Disable] {
            let once = target_flags(0, decision);
            assert_eq!(target_flags(once, decision), once);
        }
    }

    #[test]
    fn test_fallback_flags_skip_nocomp() {
        let immutable = 0x10;

        assert_eq!(fallback_flags(immutable | FS_COMPR_FL, Decision::Enable), None);

        let off = fallback_flags(immutable | FS_COMPR_FL, Decision::Disable).unwrap();
        assert_eq!(off, immutable);
        assert_eq!(off & FS_NOCOMP_FL, 0);

        // Already uncompressed: the retry would be a no-op
        assert_eq!(fallback_flags(immutable, Decision::Disable), Some(immutable));
    }
}
