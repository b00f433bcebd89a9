//! File task queue
//!
//! The tree walker is the single producer; every worker holds a receiver.
//! The queue is unbounded so traversal never waits on estimation, and it
//! closes once the producer handle is dropped. Workers drain what is left
//! and then see the disconnect.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// One regular file to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Full path to the file
    pub path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Statistics for the file queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued
    pub enqueued: AtomicU64,

    /// Total tasks dequeued
    pub dequeued: AtomicU64,
}

impl QueueStats {
    /// Tasks produced by the walker so far
    pub fn produced(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }
}

/// Unbounded multi-consumer queue of file tasks
pub struct FileQueue {
    /// Producer handle, handed out once
    sender: Option<Sender<FileTask>>,

    /// Receiver for getting tasks
    receiver: Receiver<FileTask>,

    /// Number of workers currently processing a task
    active_workers: Arc<AtomicUsize>,

    /// Queue statistics
    stats: Arc<QueueStats>,
}

impl FileQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender: Some(sender),
            receiver,
            active_workers: Arc::new(AtomicUsize::new(0)),
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Take the producer handle
    ///
    /// Returns `None` after the first call. Dropping the returned sender
    /// closes the queue.
    pub fn take_sender(&mut self) -> Option<FileQueueSender> {
        self.sender.take().map(|sender| FileQueueSender {
            sender,
            stats: Arc::clone(&self.stats),
        })
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> FileQueueReceiver {
        FileQueueReceiver {
            receiver: self.receiver.clone(),
            active_workers: Arc::clone(&self.active_workers),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get the active worker counter
    pub fn active_workers(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.active_workers)
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for FileQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for sending tasks to the queue
pub struct FileQueueSender {
    sender: Sender<FileTask>,
    stats: Arc<QueueStats>,
}

impl FileQueueSender {
    /// Send a task
    ///
    /// Fails only when every receiver is gone.
    pub fn send(&self, task: FileTask) -> Result<(), FileTask> {
        self.sender.send(task).map_err(|e| e.into_inner())?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Handle for receiving tasks from the queue
#[derive(Clone)]
pub struct FileQueueReceiver {
    receiver: Receiver<FileTask>,
    active_workers: Arc<AtomicUsize>,
    stats: Arc<QueueStats>,
}

impl FileQueueReceiver {
    /// Receive a task from the queue
    ///
    /// Blocks until a task is available. Returns `None` once the queue is
    /// closed and drained.
    pub fn recv(&self) -> Option<FileTask> {
        match self.receiver.recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Mark this worker as active
    pub fn begin_work(&self) {
        self.active_workers.fetch_add(1, Ordering::SeqCst);
    }

    /// Mark this worker as idle
    pub fn end_work(&self) {
        self.active_workers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

/// RAII guard for marking work as active
pub struct WorkGuard<'a> {
    receiver: &'a FileQueueReceiver,
}

impl<'a> WorkGuard<'a> {
    /// Create a new work guard (marks worker as active)
    pub fn new(receiver: &'a FileQueueReceiver) -> Self {
        receiver.begin_work();
        Self { receiver }
    }
}

impl<'a> Drop for WorkGuard<'a> {
    fn drop(&mut self) {
        self.receiver.end_work();
    }
}
