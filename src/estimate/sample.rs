//! In-memory compression ratio estimator
//!
//! Nothing is written back to storage: compressed output goes to a
//! [`CountingSink`] that only records how many bytes it was handed.

use crate::config::ESTIMATE_BUFFER_SIZE;
use crate::error::{FileError, FileResult};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Sizes measured for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionSample {
    /// Bytes read from the file
    pub original_size: u64,

    /// Bytes produced by the finished deflate stream
    pub compressed_size: u64,
}

impl CompressionSample {
    /// Estimated bytes saved (negative if compression expands the data)
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}

/// A writer that discards its input and counts it
#[derive(Debug, Default)]
pub struct CountingSink {
    len: u64,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes written so far
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.len += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Stream `reader` through a default-level deflate encoder
///
/// `path` is only used to label errors. The encoder is finished before the
/// sink is measured, so the trailing block is always counted.
pub fn estimate_reader<R: Read>(mut reader: R, path: &str) -> FileResult<CompressionSample> {
    let mut encoder = DeflateEncoder::new(CountingSink::new(), Compression::default());
    let mut buf = vec![0u8; ESTIMATE_BUFFER_SIZE];
    let mut original_size = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(FileError::ReadFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        original_size += n as u64;
        encoder
            .write_all(&buf[..n])
            .map_err(|e| FileError::Engine {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
    }

    let sink = encoder.finish().map_err(|e| FileError::Engine {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    Ok(CompressionSample {
        original_size,
        compressed_size: sink.len(),
    })
}

/// Estimate the compressibility of the file at `path`
///
/// Files whose size exceeds `max_size` are rejected with
/// [`FileError::TooLarge`] before any content is read.
pub fn estimate_file(path: &Path, max_size: Option<u64>) -> FileResult<CompressionSample> {
    let file = File::open(path).map_err(|e| FileError::from_io(path, &e))?;

    if let Some(limit) = max_size {
        let size = file
            .metadata()
            .map_err(|e| FileError::from_io(path, &e))?
            .len();
        if size > limit {
            return Err(FileError::TooLarge {
                path: path.display().to_string(),
                size,
                limit,
            });
        }
    }

    estimate_reader(file, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Cursor;

    /// Reader that hands out one byte per call, then fails
    struct FlakyReader {
        remaining: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
            }
            self.remaining -= 1;
            buf[0] = b'x';
            Ok(1)
        }
    }

    #[test]
    fn test_counting_sink() {
        let mut sink = CountingSink::new();
        assert!(sink.is_empty());
        sink.write_all(b"hello").unwrap();
        sink.write_all(b" world").unwrap();
        assert_eq!(sink.len(), 11);
    }

    #[test]
    fn test_estimate_matches_real_encoder() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();

        let sample = estimate_reader(Cursor::new(&data), "mem").unwrap();

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(sample.original_size, data.len() as u64);
        assert_eq!(sample.compressed_size, compressed.len() as u64);

        // The counted stream is complete: it decodes back to the input
        let mut decoded = Vec::new();
        DeflateDecoder::new(&compressed[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog ".repeat(200);
        let a = estimate_reader(Cursor::new(&data), "a").unwrap();
        let b = estimate_reader(Cursor::new(&data), "b").unwrap();
        assert_eq!(a, b);
        assert!(a.compressed_size < a.original_size);
    }

    #[test]
    fn test_estimate_empty_input() {
        let sample = estimate_reader(Cursor::new(Vec::new()), "empty").unwrap();
        assert_eq!(sample.original_size, 0);
        assert_eq!(sample.decision(), crate::estimate::Decision::Disable);
    }

    #[test]
    fn test_estimate_read_error() {
        let err = estimate_reader(FlakyReader { remaining: 3 }, "/dev/flaky").unwrap_err();
        assert_eq!(
            err,
            FileError::ReadFailed {
                path: "/dev/flaky".into(),
                reason: "device gone".into()
            }
        );
    }

    #[test]
    fn test_estimate_file_and_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zeros.bin");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();

        let sample = estimate_file(&path, None).unwrap();
        assert_eq!(sample.original_size, 4096);
        assert!(sample.compressed_size < 100);

        let err = estimate_file(&path, Some(1024)).unwrap_err();
        assert!(err.is_skip());
        assert!(matches!(err, FileError::TooLarge { size: 4096, limit: 1024, .. }));

        let err = estimate_file(&dir.path().join("missing"), None).unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
    }
}
