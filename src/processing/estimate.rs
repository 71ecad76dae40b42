//! Byte-budget estimation for display purposes.
//!
//! The estimate is advisory only: neither the convergence engine nor the
//! transcode pipeline consults it.

use crate::core::Preset;

/// Floor of every estimate (0.9 MiB). Tiny inputs still estimate at least
/// this much; an accepted display quirk, preserved deliberately.
pub const ESTIMATE_FLOOR_BYTES: u64 = 9 * 1024 * 1024 / 10;

/// Approximate output size for `input_bytes` under `preset`.
pub fn estimate_output_bytes(input_bytes: u64, preset: Preset) -> u64 {
    let ratio = match preset {
        Preset::Same => 0.75,
        Preset::Small => 0.55,
        Preset::Smallest => 0.25,
    };
    let scaled = (input_bytes as f64 * ratio).round() as u64;
    scaled.max(ESTIMATE_FLOOR_BYTES)
}
