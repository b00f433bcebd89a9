//! Enable/disable decision policy

use super::sample::CompressionSample;
use std::fmt;

/// Minimum space saving, in percent, for compression to be worth enabling
pub const COMPRESSION_EFFICIENCY_THRESHOLD: f64 = 10.0;

/// What to do with a file's compression attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Turn transparent compression on
    Enable,
    /// Turn transparent compression off
    Disable,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Enable => f.write_str("enable"),
            Decision::Disable => f.write_str("disable"),
        }
    }
}

/// Percentage of `original_size` saved by compressing down to `compressed_size`
///
/// Returns `None` for empty input, where the ratio is undefined. The result
/// is negative when the compressor expanded the data.
pub fn savings_ratio(original_size: u64, compressed_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    let saved = original_size as f64 - compressed_size as f64;
    Some(saved / original_size as f64 * 100.0)
}

/// Decide whether compression is worthwhile for a file
///
/// Empty files are always `Disable`: there is nothing to save.
pub fn decide(original_size: u64, compressed_size: u64) -> Decision {
    match savings_ratio(original_size, compressed_size) {
        Some(ratio) if ratio >= COMPRESSION_EFFICIENCY_THRESHOLD => Decision::Enable,
        _ => Decision::Disable,
    }
}

impl CompressionSample {
    /// Decision for this sample under the fixed threshold
    pub fn decision(&self) -> Decision {
        decide(self.original_size, self.compressed_size)
    }

    /// Savings ratio in percent, `None` for empty files
    pub fn savings_ratio(&self) -> Option<f64> {
        savings_ratio(self.original_size, self.compressed_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_threshold() {
        assert_eq!(decide(100, 85), Decision::Enable);
        assert_eq!(decide(100, 90), Decision::Enable);
        assert_eq!(decide(100, 95), Decision::Disable);
        assert_eq!(decide(100, 100), Decision::Disable);
    }

    #[test]
    fn test_decide_empty_file() {
        assert_eq!(savings_ratio(0, 0), None);
        assert_eq!(decide(0, 0), Decision::Disable);
        // Deflate emits a few bytes even for empty input
        assert_eq!(decide(0, 2), Decision::Disable);
    }

    #[test]
    fn test_savings_ratio_values() {
        let ratio = savings_ratio(100, 85).unwrap();
        assert!((ratio - 15.0).abs() < f64::EPSILON);

        // Expansion gives a negative ratio, never enable
        let ratio = savings_ratio(10, 25).unwrap();
        assert!(ratio < 0.0);
        assert_eq!(decide(10, 25), Decision::Disable);
    }

    #[test]
    fn test_sample_decision() {
        let sample = CompressionSample {
            original_size: 10_000,
            compressed_size: 120,
        };
        assert_eq!(sample.decision(), Decision::Enable);
        assert_eq!(sample.bytes_saved(), 9_880);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Enable.to_string(), "enable");
        assert_eq!(Decision::Disable.to_string(), "disable");
    }
}
