//! compact-walker - Filesystem Compression Advisor
//!
//! Walks a directory tree, estimates how well each regular file would
//! compress, and enables or disables the filesystem's transparent
//! compression attribute for it.
//!
//! # How a file is judged
//!
//! The file is streamed through an in-memory deflate encoder at the default
//! level. If that saves at least 10% of the original size, compression is
//! enabled; otherwise it is disabled. Empty files are always disabled.
//! Nothing is written to file contents.
//!
//! # Architecture
//!
//! - One walker thread emits regular-file paths into an unbounded queue.
//! - A fixed pool of worker threads (200 by default) drains the queue.
//! - Each worker runs estimate → decide → apply and records the outcome.
//! - Per-file failures are logged and counted; they never stop the run.
//!
//! # Example
//!
//! ```bash
//! # Report what would change without touching anything
//! compact-walker /srv/data --dry-run
//!
//! # Apply, with a progress spinner
//! compact-walker /srv/data -p
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod estimate;
pub mod progress;
pub mod walker;

pub use config::{CliArgs, PipelineConfig, RunConfig};
pub use control::{CompressionController, DryRunController, NativeController};
pub use error::{CompactError, FileError, FileOutcome, Result};
pub use estimate::{decide, CompressionSample, Decision};
pub use walker::{CompressionCoordinator, RunResult, RunStatistics, RunStats};
