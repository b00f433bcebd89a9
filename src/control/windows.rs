//! Windows compression control via `FSCTL_SET_COMPRESSION`

use super::CompressionController;
use crate::error::{FileError, FileResult};
use crate::estimate::Decision;
use std::ffi::c_void;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle};
use std::path::Path;
use std::ptr;
use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_INVALID_FUNCTION, ERROR_NOT_SUPPORTED,
    ERROR_PATH_NOT_FOUND, GENERIC_READ, GENERIC_WRITE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_FLAG_BACKUP_SEMANTICS, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use windows_sys::Win32::System::IO::DeviceIoControl;

const FSCTL_SET_COMPRESSION: u32 = 0x0009_C040;
const COMPRESSION_FORMAT_NONE: u16 = 0;
const COMPRESSION_FORMAT_DEFAULT: u16 = 1;

/// Native controller backed by NTFS per-file compression
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeController;

impl NativeController {
    pub fn new() -> Self {
        Self
    }
}

impl CompressionController for NativeController {
    fn apply(&self, path: &Path, decision: Decision) -> FileResult<()> {
        let wide: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();

        // SAFETY: `wide` is NUL-terminated and outlives the call
        let raw = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                ptr::null(),
                OPEN_EXISTING,
                FILE_FLAG_BACKUP_SEMANTICS,
                ptr::null_mut(),
            )
        };
        if raw == INVALID_HANDLE_VALUE {
            return Err(win32_error(path, decision, io::Error::last_os_error()));
        }
        // SAFETY: `raw` is a valid handle we own; dropping closes it
        let handle = unsafe { OwnedHandle::from_raw_handle(raw as RawHandle) };

        let format = match decision {
            Decision::Enable => COMPRESSION_FORMAT_DEFAULT,
            Decision::Disable => COMPRESSION_FORMAT_NONE,
        };
        let mut returned = 0u32;

        // SAFETY: input buffer is a live u16, no output buffer, synchronous call
        let ok = unsafe {
            DeviceIoControl(
                handle.as_raw_handle() as _,
                FSCTL_SET_COMPRESSION,
                &format as *const u16 as *const c_void,
                std::mem::size_of::<u16>() as u32,
                ptr::null_mut(),
                0,
                &mut returned,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(win32_error(path, decision, io::Error::last_os_error()));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ntfs-fsctl"
    }
}

fn win32_error(path: &Path, decision: Decision, err: io::Error) -> FileError {
    let path_str = path.display().to_string();
    match err.raw_os_error().map(|c| c as u32) {
        Some(ERROR_FILE_NOT_FOUND) | Some(ERROR_PATH_NOT_FOUND) => {
            FileError::NotFound { path: path_str }
        }
        Some(ERROR_ACCESS_DENIED) => FileError::PermissionDenied { path: path_str },
        Some(ERROR_INVALID_FUNCTION) | Some(ERROR_NOT_SUPPORTED) => FileError::Unsupported {
            path: path_str,
            reason: err.to_string(),
        },
        _ => FileError::ApplyFailed {
            path: path_str,
            decision,
            reason: err.to_string(),
        },
    }
}
