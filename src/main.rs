//! compact-walker - Filesystem Compression Advisor
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use compact_walker::config::{CliArgs, RunConfig};
use compact_walker::control::{CompressionController, DryRunController, NativeController};
use compact_walker::progress::{print_header, print_summary, ProgressReporter};
use compact_walker::walker::CompressionCoordinator;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Usage errors exit here with clap's usage text and a non-zero code
    let args = CliArgs::parse();

    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    setup_logging(config.verbose, config.quiet)?;

    let controller: Arc<dyn CompressionController> = if config.dry_run {
        Arc::new(DryRunController)
    } else {
        Arc::new(NativeController::new())
    };

    if config.show_progress {
        print_header(
            &config.root.display().to_string(),
            config.pipeline.worker_count,
            controller.name(),
        );
    }

    let coordinator = CompressionCoordinator::new(config.pipeline.clone(), controller)
        .context("Failed to initialize pipeline")?;

    let result = if config.show_progress {
        let reporter = ProgressReporter::new();
        reporter.set_status("Scanning...");

        let updater = reporter.clone();
        let result = coordinator
            .run_with_progress(&config.root, move |p| updater.update(&p))
            .with_context(|| format!("Scan of '{}' failed", config.root.display()));

        reporter.finish("Scan completed");
        result?
    } else {
        coordinator
            .run(&config.root)
            .with_context(|| format!("Scan of '{}' failed", config.root.display()))?
    };

    print_summary(&result, config.dry_run);

    // Per-file failures never change the exit code
    if result.stats.files_failed > 0 || result.walk_errors > 0 {
        info!(
            failed = result.stats.files_failed,
            walk_errors = result.walk_errors,
            "Scan completed with errors"
        );
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("compact_walker=debug,warn")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("compact_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
