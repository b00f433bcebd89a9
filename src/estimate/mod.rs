//! Compressibility estimation
//!
//! Measures how well a file would compress by streaming it through an
//! in-memory deflate encoder, then turns the measurement into an
//! enable/disable [`Decision`].
//!
//! ```text
//!   file bytes ──► DeflateEncoder ──► CountingSink
//!        │                                 │
//!        ▼                                 ▼
//!   original_size              estimated_compressed_size
//!        └──────────────┬──────────────────┘
//!                       ▼
//!                 decide() ──► Enable | Disable
//! ```

pub mod policy;
pub mod sample;

pub use policy::{decide, savings_ratio, Decision, COMPRESSION_EFFICIENCY_THRESHOLD};
pub use sample::{estimate_file, estimate_reader, CompressionSample, CountingSink};
