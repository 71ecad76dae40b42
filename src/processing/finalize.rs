//! Result finalization: savings bookkeeping for a completed run.

use crate::core::{Asset, CompressionResult};

/// Packages a run's output with its savings statistics. Pure and total.
///
/// `saved_percent = round(saved_bytes / original_size × 100)` when the
/// original is non-empty, else 0.
pub fn finalize(original_size: u64, output: Asset) -> CompressionResult {
    let output_size = output.len();
    let saved_bytes = original_size.saturating_sub(output_size);
    let saved_percent = if original_size > 0 {
        ((saved_bytes as f64 / original_size as f64) * 100.0).round() as u8
    } else {
        0
    };
    CompressionResult {
        output,
        original_size,
        output_size,
        saved_bytes,
        saved_percent,
    }
}
