//! Configuration types for compact-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Pipeline configuration with validation
//! - Fixed tuning constants

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Default number of worker threads; estimation is I/O bound so the pool
/// is much larger than the core count
pub const DEFAULT_WORKER_COUNT: usize = 200;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 1024;

/// Files larger than this are skipped (4 GiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Read buffer used while streaming a file through the estimator
pub const ESTIMATE_BUFFER_SIZE: usize = 64 * 1024;

/// Enable or disable transparent filesystem compression per file
#[derive(Parser, Debug, Clone)]
#[command(
    name = "compact-walker",
    version,
    about = "Enable filesystem compression where it saves space, disable it where it doesn't",
    long_about = "Walks a directory tree, estimates how well every regular file compresses \
                  in memory, and enables the filesystem's transparent compression for files \
                  that save at least 10%. Compression is disabled for the rest.\n\n\
                  Nothing is written to file contents; only the compression attribute changes.",
    after_help = "EXAMPLES:\n    \
        compact-walker /srv/data\n    \
        compact-walker /srv/data --dry-run -p\n    \
        compact-walker 'D:\\Archive' -q"
)]
pub struct CliArgs {
    /// Root directory to scan
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Estimate and report only; never change compression attributes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show a live progress spinner
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode - suppress per-file lines
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Worker pool and estimator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of worker threads
    pub worker_count: usize,

    /// Skip files above this size (no limit if unset)
    pub max_file_size: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

impl PipelineConfig {
    /// Configuration with `worker_count` workers and default limits
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKERS,
            });
        }

        if self.max_file_size == Some(0) {
            return Err(ConfigError::InvalidSizeCeiling { limit: 0 });
        }

        Ok(())
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root directory to walk
    pub root: PathBuf,

    /// Pool and estimator settings
    pub pipeline: PipelineConfig,

    /// Use the dry-run controller
    pub dry_run: bool,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,

    /// Suppress per-file output
    pub quiet: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let pipeline = PipelineConfig::default();
        pipeline.validate()?;

        Ok(Self {
            root: args.root,
            pipeline,
            dry_run: args.dry_run,
            show_progress: args.progress,
            verbose: args.verbose,
            quiet: args.quiet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.worker_count, DEFAULT_WORKER_COUNT);
        assert_eq!(config.max_file_size, Some(DEFAULT_MAX_FILE_SIZE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_worker_count() {
        assert!(matches!(
            PipelineConfig::with_workers(0).validate(),
            Err(ConfigError::InvalidWorkerCount { count: 0, .. })
        ));
        assert!(PipelineConfig::with_workers(MAX_WORKERS + 1)
            .validate()
            .is_err());
        assert!(PipelineConfig::with_workers(1).validate().is_ok());
    }

    #[test]
    fn test_zero_size_ceiling() {
        let config = PipelineConfig {
            worker_count: 4,
            max_file_size: Some(0),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeCeiling { limit: 0 })
        ));
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from(["compact-walker", "/data", "-n", "-p"]).unwrap();
        assert_eq!(args.root, PathBuf::from("/data"));
        assert!(args.dry_run);
        assert!(args.progress);

        let config = RunConfig::from_args(args).unwrap();
        assert!(config.dry_run);
        assert!(config.show_progress);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_cli_usage_errors() {
        // Missing root
        assert!(CliArgs::try_parse_from(["compact-walker"]).is_err());
        // Extra positional
        assert!(CliArgs::try_parse_from(["compact-walker", "/a", "/b"]).is_err());
        // Verbose and quiet together
        assert!(CliArgs::try_parse_from(["compact-walker", "/a", "-v", "-q"]).is_err());
    }
}
