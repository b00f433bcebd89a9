//! Fallback for platforms without per-file compression control

use super::CompressionController;
use crate::error::{FileError, FileResult};
use crate::estimate::Decision;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeController;

impl NativeController {
    pub fn new() -> Self {
        Self
    }
}

impl CompressionController for NativeController {
    fn apply(&self, path: &Path, _decision: Decision) -> FileResult<()> {
        Err(FileError::Unsupported {
            path: path.display().to_string(),
            reason: format!("no compression control on {}", std::env::consts::OS),
        })
    }

    fn name(&self) -> &'static str {
        "unsupported"
    }
}
