//! Preset resolution: pure mapping from a preset tier to encoding parameters.

use crate::core::{ImageParams, Preset, VideoParams};
use crate::utils::is_high_compression_source;

/// Resolves image parameters for a preset.
///
/// Total, no error case. High-compression sources (HEIC/HEIF mime hints) get
/// a lower starting quality, since re-encoding an already-compressed source
/// needs a lower ceiling to hit the same size ratio.
pub fn resolve_image(preset: Preset, mime_hint: &str) -> ImageParams {
    let high_compression = is_high_compression_source(mime_hint);
    match preset {
        Preset::Same => ImageParams {
            max_dimension: None,
            target_ratio: 0.80,
            q_start: if high_compression { 0.70 } else { 0.85 },
            q_min: 0.60,
        },
        Preset::Small => ImageParams {
            max_dimension: Some(1280),
            target_ratio: 0.55,
            q_start: if high_compression { 0.60 } else { 0.78 },
            q_min: 0.50,
        },
        Preset::Smallest => ImageParams {
            max_dimension: Some(720),
            target_ratio: 0.30,
            q_start: if high_compression { 0.50 } else { 0.66 },
            q_min: 0.40,
        },
    }
}

/// Resolves video parameters for a preset. Encoder speed, pixel format,
/// container flags and audio settings are fixed constants independent of
/// the preset (see [`crate::core::types`]).
pub fn resolve_video(preset: Preset) -> VideoParams {
    match preset {
        Preset::Same => VideoParams {
            crf: 23,
            max_width: None,
        },
        Preset::Small => VideoParams {
            crf: 28,
            max_width: Some(1080),
        },
        Preset::Smallest => VideoParams {
            crf: 30,
            max_width: Some(720),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_table_matches_the_tiers() {
        let same = resolve_image(Preset::Same, "image/jpeg");
        assert_eq!(same.max_dimension, None);
        assert_eq!(same.target_ratio, 0.80);
        assert_eq!(same.q_start, 0.85);
        assert_eq!(same.q_min, 0.60);

        let small = resolve_image(Preset::Small, "image/png");
        assert_eq!(small.max_dimension, Some(1280));
        assert_eq!(small.target_ratio, 0.55);
        assert_eq!(small.q_start, 0.78);
        assert_eq!(small.q_min, 0.50);

        let smallest = resolve_image(Preset::Smallest, "image/jpeg");
        assert_eq!(smallest.max_dimension, Some(720));
        assert_eq!(smallest.target_ratio, 0.30);
        assert_eq!(smallest.q_start, 0.66);
        assert_eq!(smallest.q_min, 0.40);
    }

    #[test]
    fn high_compression_sources_lower_the_start_quality() {
        assert_eq!(resolve_image(Preset::Same, "image/heic").q_start, 0.70);
        assert_eq!(resolve_image(Preset::Small, "image/heif").q_start, 0.60);
        assert_eq!(resolve_image(Preset::Smallest, "image/heic").q_start, 0.50);
        // The floor does not move
        assert_eq!(resolve_image(Preset::Small, "image/heic").q_min, 0.50);
    }

    #[test]
    fn video_table_matches_the_tiers() {
        assert_eq!(
            resolve_video(Preset::Same),
            VideoParams {
                crf: 23,
                max_width: None
            }
        );
        assert_eq!(
            resolve_video(Preset::Small),
            VideoParams {
                crf: 28,
                max_width: Some(1080)
            }
        );
        assert_eq!(
            resolve_video(Preset::Smallest),
            VideoParams {
                crf: 30,
                max_width: Some(720)
            }
        );
    }

    #[test]
    fn unknown_preset_resolves_like_small_on_both_paths() {
        let preset = Preset::from_name("ultra");
        assert_eq!(
            resolve_image(preset, "image/jpeg"),
            resolve_image(Preset::Small, "image/jpeg")
        );
        assert_eq!(resolve_video(preset), resolve_video(Preset::Small));
    }
}
