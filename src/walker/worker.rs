//! Worker thread logic for the estimation pool
//!
//! Each worker:
//! - Pulls file tasks from the shared queue until it is closed and drained
//! - Estimates compressibility in memory
//! - Decides enable/disable against the efficiency threshold
//! - Applies the decision through the compression controller
//! - Records the outcome in the shared run statistics

use crate::config::PipelineConfig;
use crate::control::CompressionController;
use crate::error::{FileOutcome, WorkerError};
use crate::estimate::{estimate_file, Decision};
use crate::walker::queue::{FileQueueReceiver, FileTask, WorkGuard};
use crate::walker::stats::RunStats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Statistics collected by a single worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Tasks taken from the queue
    pub files_handled: AtomicU64,

    /// Tasks that ended in failure
    pub errors: AtomicU64,
}

impl WorkerStats {
    fn record_file(&self) {
        self.files_handled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// A worker thread that processes file tasks
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        config: Arc<PipelineConfig>,
        queue_rx: FileQueueReceiver,
        controller: Arc<dyn CompressionController>,
        run_stats: RunStats,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("estimator-{}", id))
            .spawn(move || {
                worker_loop(id, config, queue_rx, controller, run_stats, stats_clone)
            })
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked {
                id: self.id,
                message: "Worker thread panicked".into(),
            }),
            None => Ok(()),
        }
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    config: Arc<PipelineConfig>,
    queue_rx: FileQueueReceiver,
    controller: Arc<dyn CompressionController>,
    run_stats: RunStats,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    // recv() returns None only once the walker has closed the queue and it is drained
    while let Some(task) = queue_rx.recv() {
        let _guard = WorkGuard::new(&queue_rx);
        stats.record_file();

        let outcome = process_file(id, &task, &config, controller.as_ref());

        match &outcome {
            FileOutcome::Skipped { path, reason } => {
                info!(worker = id, path = %path, reason = %reason, "Skipping file");
            }
            FileOutcome::Failed { path, error } => {
                stats.record_error();
                warn!(worker = id, path = %path, error = %error, "File failed");
            }
            _ => {}
        }

        run_stats.record(&outcome);
    }

    debug!(
        worker = id,
        files = stats.files_handled.load(Ordering::Relaxed),
        errors = stats.errors.load(Ordering::Relaxed),
        "Worker shutting down"
    );
}

/// Run one file through estimate, decide and apply
pub fn process_file(
    worker_id: usize,
    task: &FileTask,
    config: &PipelineConfig,
    controller: &dyn CompressionController,
) -> FileOutcome {
    let path = task.path();

    let sample = match estimate_file(path, config.max_file_size) {
        Ok(sample) => sample,
        Err(e) => return FileOutcome::from_error(e),
    };

    let decision = sample.decision();
    let ratio = sample
        .savings_ratio()
        .map(|r| format!("{:.2}%", r))
        .unwrap_or_else(|| "n/a".to_string());

    match decision {
        Decision::Enable => info!(
            worker = worker_id,
            path = %path.display(),
            ratio = %ratio,
            "Compression beneficial, enabling"
        ),
        Decision::Disable => info!(
            worker = worker_id,
            path = %path.display(),
            ratio = %ratio,
            "Compression not worthwhile, disabling"
        ),
    }

    if let Err(e) = controller.apply(path, decision) {
        return FileOutcome::from_error(e);
    }

    let path = path.display().to_string();
    match decision {
        Decision::Enable => FileOutcome::Compressed {
            path,
            bytes_saved: sample.bytes_saved(),
        },
        Decision::Disable => FileOutcome::Decompressed { path },
    }
}

/// Aggregate per-worker counters: (files handled, errors)
pub fn aggregate_stats(workers: &[Worker]) -> (u64, u64) {
    workers.iter().fold((0, 0), |(files, errors), worker| {
        (
            files + worker.stats.files_handled.load(Ordering::Relaxed),
            errors + worker.stats.errors.load(Ordering::Relaxed),
        )
    })
}
