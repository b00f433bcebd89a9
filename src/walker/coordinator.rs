//! Pipeline coordinator - orchestrates the walk and the worker pool
//!
//! The coordinator is responsible for:
//! - Validating the root before anything starts
//! - Spawning the worker pool and the tree walker
//! - Optional progress polling
//! - Joining everything and returning the final statistics

use crate::config::PipelineConfig;
use crate::control::CompressionController;
use crate::error::{Result, WorkerError};
use crate::walker::queue::FileQueue;
use crate::walker::stats::{RunStatistics, RunStats};
use crate::walker::tree::{validate_root, TreeWalker};
use crate::walker::worker::{aggregate_stats, Worker};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often the progress callback is invoked
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final aggregate statistics
    pub stats: RunStatistics,

    /// Regular files found by the walker
    pub files_queued: u64,

    /// Paths the walker could not visit
    pub walk_errors: u64,

    /// Time taken for the run
    pub duration: Duration,
}

/// Progress information for display
#[derive(Debug, Clone, Default)]
pub struct PipelineProgress {
    /// Running totals
    pub stats: RunStatistics,

    /// Files found by the walker so far
    pub files_queued: u64,

    /// Tasks waiting in the queue
    pub queue_size: usize,

    /// Workers currently processing a file
    pub active_workers: usize,

    /// Pool size
    pub total_workers: usize,

    /// Elapsed time
    pub elapsed: Duration,
}

impl PipelineProgress {
    /// Calculate files per second rate
    pub fn files_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.files_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Coordinates the tree walker and the worker pool
pub struct CompressionCoordinator {
    /// Pool configuration
    config: Arc<PipelineConfig>,

    /// Applies decisions to files
    controller: Arc<dyn CompressionController>,

    /// Shared run statistics
    stats: RunStats,
}

impl CompressionCoordinator {
    /// Create a new coordinator
    pub fn new(config: PipelineConfig, controller: Arc<dyn CompressionController>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            controller,
            stats: RunStats::new(),
        })
    }

    /// Handle to the shared statistics
    pub fn stats(&self) -> RunStats {
        self.stats.clone()
    }

    /// Process every regular file under `root`
    pub fn run(self, root: &Path) -> Result<RunResult> {
        self.run_inner(root, None::<fn(PipelineProgress)>)
    }

    /// Like [`run`](Self::run), calling `progress_callback` periodically
    /// from a separate thread until the pool drains
    pub fn run_with_progress<F>(self, root: &Path, progress_callback: F) -> Result<RunResult>
    where
        F: Fn(PipelineProgress) + Send + 'static,
    {
        self.run_inner(root, Some(progress_callback))
    }

    fn run_inner<F>(self, root: &Path, progress_callback: Option<F>) -> Result<RunResult>
    where
        F: Fn(PipelineProgress) + Send + 'static,
    {
        let start = Instant::now();

        // A bad root aborts before any thread is started
        let root = validate_root(root)?;

        info!(
            root = %root.display(),
            workers = self.config.worker_count,
            controller = self.controller.name(),
            "Starting compression scan"
        );

        let mut queue = FileQueue::new();
        let sender = queue.take_sender().ok_or_else(|| WorkerError::InitFailed {
            id: 0,
            reason: "file queue sender already taken".into(),
        })?;

        let workers = match self.spawn_workers(&queue) {
            Ok(workers) => workers,
            Err(e) => {
                // Closing the queue lets already spawned workers exit
                drop(sender);
                return Err(e.into());
            }
        };

        let walker = match TreeWalker::spawn(root.clone(), sender) {
            Ok(walker) => walker,
            Err(e) => {
                join_workers(workers);
                return Err(e.into());
            }
        };

        let done = Arc::new(AtomicBool::new(false));
        let progress_handle = progress_callback.map(|callback| {
            let done = Arc::clone(&done);
            let stats = self.stats.clone();
            let queue_rx = queue.receiver();
            let queue_stats = queue.stats();
            let active = queue.active_workers();
            let total_workers = self.config.worker_count;

            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    callback(PipelineProgress {
                        stats: stats.snapshot(),
                        files_queued: queue_stats.produced(),
                        queue_size: queue_rx.len(),
                        active_workers: active.load(Ordering::Relaxed),
                        total_workers,
                        elapsed: start.elapsed(),
                    });
                    thread::sleep(PROGRESS_INTERVAL);
                }
            })
        });

        let walk_stats = match walker.join() {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Tree walker failed");
                Default::default()
            }
        };
        debug!(files = walk_stats.files_queued, "Walker finished, draining queue");

        let (handled, worker_errors) = join_workers(workers);

        done.store(true, Ordering::SeqCst);
        if let Some(handle) = progress_handle {
            let _ = handle.join();
        }

        // The root vanished or became unreadable after validation
        if let Some(err) = walk_stats.root_error {
            return Err(err.into());
        }

        let stats = self.stats.snapshot();
        let duration = start.elapsed();

        info!(
            processed = stats.files_processed,
            compressed = stats.files_compressed,
            decompressed = stats.files_decompressed,
            failed = stats.files_failed,
            bytes_saved = stats.bytes_saved,
            handled = handled,
            worker_errors = worker_errors,
            duration_secs = duration.as_secs(),
            "Scan completed"
        );

        Ok(RunResult {
            stats,
            files_queued: walk_stats.files_queued,
            walk_errors: walk_stats.errors,
            duration,
        })
    }

    /// Spawn the worker pool
    fn spawn_workers(&self, queue: &FileQueue) -> std::result::Result<Vec<Worker>, WorkerError> {
        let mut workers = Vec::with_capacity(self.config.worker_count);

        for id in 0..self.config.worker_count {
            let worker = Worker::spawn(
                id,
                Arc::clone(&self.config),
                queue.receiver(),
                Arc::clone(&self.controller),
                self.stats.clone(),
            )?;
            workers.push(worker);
        }

        debug!(count = workers.len(), "Workers spawned");
        Ok(workers)
    }
}

/// Join all worker threads and collect their counters
fn join_workers(workers: Vec<Worker>) -> (u64, u64) {
    let totals = aggregate_stats(&workers);

    for worker in workers {
        let id = worker.id();
        if let Err(e) = worker.join() {
            warn!(worker = id, error = %e, "Worker failed to join cleanly");
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::DryRunController;
    use crate::error::{CompactError, ConfigError, WalkError};

    #[test]
    fn test_progress_rate() {
        let progress = PipelineProgress {
            stats: RunStatistics {
                files_processed: 500,
                ..Default::default()
            },
            elapsed: Duration::from_secs(10),
            ..Default::default()
        };
        assert!((progress.files_per_second() - 50.0).abs() < 0.1);

        let idle = PipelineProgress::default();
        assert_eq!(idle.files_per_second(), 0.0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = CompressionCoordinator::new(
            PipelineConfig::with_workers(0),
            Arc::new(DryRunController),
        );
        assert!(matches!(
            result,
            Err(CompactError::Config(ConfigError::InvalidWorkerCount { .. }))
        ));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator =
            CompressionCoordinator::new(PipelineConfig::with_workers(2), Arc::new(DryRunController))
                .unwrap();
        let stats = coordinator.stats();

        let result = coordinator.run(&dir.path().join("absent"));
        assert!(matches!(
            result,
            Err(CompactError::Walk(WalkError::RootNotFound { .. }))
        ));
        assert_eq!(stats.snapshot(), RunStatistics::default());
    }

    #[test]
    fn test_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator =
            CompressionCoordinator::new(PipelineConfig::with_workers(4), Arc::new(DryRunController))
                .unwrap();

        let result = coordinator.run(dir.path()).unwrap();
        assert_eq!(result.stats, RunStatistics::default());
        assert_eq!(result.files_queued, 0);
    }
}
