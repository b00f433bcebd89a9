//! Concurrent file-processing pipeline
//!
//! ```text
//!   ┌──────────────┐   FileTask    ┌──────────────────────────┐
//!   │  TreeWalker  │ ────────────► │  FileQueue (unbounded)   │
//!   │  (1 thread)  │               └────────────┬─────────────┘
//!   └──────────────┘                            │
//!         ┌──────────────────┬──────────────────┼──────────────────┐
//!         ▼                  ▼                  ▼                  ▼
//!   ┌───────────┐      ┌───────────┐      ┌───────────┐      ┌───────────┐
//!   │ Worker 1  │      │ Worker 2  │      │ Worker 3  │ ...  │ Worker N  │
//!   │ estimate  │      │ estimate  │      │ estimate  │      │ estimate  │
//!   │ decide    │      │ decide    │      │ decide    │      │ decide    │
//!   │ apply     │      │ apply     │      │ apply     │      │ apply     │
//!   └─────┬─────┘      └─────┬─────┘      └─────┬─────┘      └─────┬─────┘
//!         └──────────────────┴────────┬─────────┴──────────────────┘
//!                                     ▼
//!                          ┌─────────────────────┐
//!                          │ RunStats (one lock) │
//!                          └─────────────────────┘
//! ```

pub mod coordinator;
pub mod queue;
pub mod stats;
pub mod tree;
pub mod worker;

pub use coordinator::{CompressionCoordinator, PipelineProgress, RunResult};
pub use queue::{FileQueue, FileTask};
pub use stats::{RunStatistics, RunStats};
pub use tree::{validate_root, TreeWalker};
