//! Run statistics aggregator
//!
//! Every worker records its per-file outcome through a shared [`RunStats`]
//! handle. All counters are updated under a single lock so a reader never
//! sees a file counted as processed but not yet classified.

use crate::error::FileOutcome;
use parking_lot::Mutex;
use std::sync::Arc;

/// Totals for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Files that reached a final outcome
    pub files_processed: u64,

    /// Files whose compression was enabled
    pub files_compressed: u64,

    /// Files whose compression was disabled
    pub files_decompressed: u64,

    /// Files left alone (above the size ceiling)
    pub files_skipped: u64,

    /// Files that failed to estimate or apply
    pub files_failed: u64,

    /// Estimated bytes saved across compressed files
    pub bytes_saved: i64,
}

impl RunStatistics {
    /// Check that every processed file was classified exactly once
    pub fn is_balanced(&self) -> bool {
        self.files_processed
            == self.files_compressed
                + self.files_decompressed
                + self.files_skipped
                + self.files_failed
    }

    fn apply(&mut self, outcome: &FileOutcome) {
        self.files_processed += 1;
        match outcome {
            FileOutcome::Compressed { bytes_saved, .. } => {
                self.files_compressed += 1;
                self.bytes_saved += bytes_saved;
            }
            FileOutcome::Decompressed { .. } => self.files_decompressed += 1,
            FileOutcome::Skipped { .. } => self.files_skipped += 1,
            FileOutcome::Failed { .. } => self.files_failed += 1,
        }
    }
}

/// Shared, thread-safe handle to the run statistics
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    inner: Arc<Mutex<RunStatistics>>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one file
    pub fn record(&self, outcome: &FileOutcome) {
        self.inner.lock().apply(outcome);
    }

    /// Copy of the current totals
    ///
    /// Final only once every worker has been joined.
    pub fn snapshot(&self) -> RunStatistics {
        *self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;
    use std::thread;

    #[test]
    fn test_record_outcomes() {
        let stats = RunStats::new();

        stats.record(&FileOutcome::Compressed {
            path: "/a".into(),
            bytes_saved: 1500,
        });
        stats.record(&FileOutcome::Decompressed { path: "/b".into() });
        stats.record(&FileOutcome::Skipped {
            path: "/c".into(),
            reason: "too large".into(),
        });
        stats.record(&FileOutcome::Failed {
            path: "/d".into(),
            error: FileError::NotFound { path: "/d".into() },
        });

        let snap = stats.snapshot();
        assert_eq!(snap.files_processed, 4);
        assert_eq!(snap.files_compressed, 1);
        assert_eq!(snap.files_decompressed, 1);
        assert_eq!(snap.files_skipped, 1);
        assert_eq!(snap.files_failed, 1);
        assert_eq!(snap.bytes_saved, 1500);
        assert!(snap.is_balanced());
    }

    #[test]
    fn test_concurrent_record() {
        let stats = RunStats::new();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let stats = stats.clone();
                thread::spawn(move || {
                    for i in 0..1000 {
                        let outcome = if (t + i) % 2 == 0 {
                            FileOutcome::Compressed {
                                path: format!("/{t}/{i}"),
                                bytes_saved: 10,
                            }
                        } else {
                            FileOutcome::Decompressed {
                                path: format!("/{t}/{i}"),
                            }
                        };
                        stats.record(&outcome);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snap = stats.snapshot();
        assert_eq!(snap.files_processed, 8000);
        assert_eq!(snap.files_compressed, 4000);
        assert_eq!(snap.files_decompressed, 4000);
        assert_eq!(snap.bytes_saved, 40_000);
        assert!(snap.is_balanced());
    }
}
