//! Progress reporting and run summary
//!
//! Provides a live spinner using indicatif and the final styled summary.

use crate::walker::{PipelineProgress, RunResult};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays pipeline status
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &PipelineProgress) {
        let msg = format!(
            "Found: {} | Done: {} | On: {} | Off: {} | Failed: {} | Saved: {} | Rate: {:.0}/s | Queue: {} | Workers: {}/{}",
            format_number(progress.files_queued),
            format_number(progress.stats.files_processed),
            format_number(progress.stats.files_compressed),
            format_number(progress.stats.files_decompressed),
            format_number(progress.stats.files_failed),
            format_signed_size(progress.stats.bytes_saved),
            progress.files_per_second(),
            progress.queue_size,
            progress.active_workers,
            progress.total_workers,
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Human-readable size that keeps the sign of a byte delta
fn format_signed_size(bytes: i64) -> String {
    let size = format_size(bytes.unsigned_abs(), BINARY);
    if bytes < 0 {
        format!("-{}", size)
    } else {
        size
    }
}

/// Print a summary of the run
pub fn print_summary(result: &RunResult, dry_run: bool) {
    let stats = &result.stats;
    let duration_secs = result.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        stats.files_processed as f64 / duration_secs
    } else {
        0.0
    };

    let title = if dry_run {
        "Summary (dry run)"
    } else {
        "Summary"
    };

    println!();
    println!("{}", style(title).green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Total files processed:").bold(),
        format_number(stats.files_processed)
    );
    println!(
        "  {} {}",
        style("Total files compressed:").bold(),
        format_number(stats.files_compressed)
    );
    println!(
        "  {} {}",
        style("Total files decompressed:").bold(),
        format_number(stats.files_decompressed)
    );
    println!(
        "  {} {} bytes ({})",
        style("Total space saved:").bold(),
        stats.bytes_saved,
        format_signed_size(stats.bytes_saved)
    );
    if stats.files_skipped > 0 {
        println!(
            "  {} {}",
            style("Skipped:").yellow().bold(),
            format_number(stats.files_skipped)
        );
    }
    if stats.files_failed > 0 || result.walk_errors > 0 {
        println!(
            "  {} {} files, {} paths not visited",
            style("Errors:").yellow().bold(),
            format_number(stats.files_failed),
            format_number(result.walk_errors)
        );
    }
    println!(
        "  {} {:.1}s ({:.0} files/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    println!();
}

/// Print a header at the start of the run
pub fn print_header(root: &str, workers: usize, controller: &str) {
    println!();
    println!(
        "{} {}",
        style("compact-walker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Root:").bold(), root);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Controller:").bold(), controller);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_signed_size() {
        let positive = format_signed_size(2048);
        assert!(positive.contains("KiB"));
        assert!(!positive.starts_with('-'));

        let negative = format_signed_size(-2048);
        assert_eq!(negative, format!("-{}", positive));
    }
}
