//! Core types for compression presets, parameters, assets and results.

use serde::{Deserialize, Deserializer, Serialize};

/// Named quality/size tier selected by the caller.
///
/// Unknown preset names resolve to [`Preset::Small`], both through
/// [`Preset::from_name`] and through deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Same,
    #[default]
    Small,
    Smallest,
}

impl Preset {
    /// Total mapping from a preset name; anything unrecognized is `Small`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "same" => Self::Same,
            "smallest" => Self::Smallest,
            _ => Self::Small,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Small => "small",
            Self::Smallest => "smallest",
        }
    }
}

impl<'de> Deserialize<'de> for Preset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Preset::from_name(&name))
    }
}

/// Parameters driving the image convergence engine. Immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageParams {
    /// Long-edge cap in pixels; `None` keeps the native dimensions
    pub max_dimension: Option<u32>,
    /// Fraction of the input size the encoded output should converge on
    pub target_ratio: f64,
    /// Quality of the first encode attempt, fraction in (0, 1]
    pub q_start: f32,
    /// Quality floor the descent never crosses
    pub q_min: f32,
}

// Fixed encoder settings shared by every video preset.
pub const VIDEO_CODEC: &str = "libx264";
pub const SPEED_PRESET: &str = "veryfast";
pub const PIXEL_FORMAT: &str = "yuv420p";
pub const AUDIO_CODEC: &str = "aac";
pub const AUDIO_BITRATE: &str = "128k";

/// Parameters driving the video transcode pipeline. Immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoParams {
    /// Constant rate factor; higher values produce smaller, lower-fidelity output
    pub crf: u32,
    /// Width cap in pixels; `None` keeps the native width
    pub max_width: Option<u32>,
}

impl VideoParams {
    /// Builds the full encoder argument list for one transcode of `input`
    /// into `output`. The scale filter never enlarges (`min(W,iw)`) and
    /// keeps the height even, which the pixel format requires.
    pub fn to_args(&self, input: &str, output: &str) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-i".into(),
            input.into(),
            "-pix_fmt".into(),
            PIXEL_FORMAT.into(),
            "-c:v".into(),
            VIDEO_CODEC.into(),
            "-crf".into(),
            self.crf.to_string(),
            "-preset".into(),
            SPEED_PRESET.into(),
        ];
        if let Some(width) = self.max_width {
            args.push("-vf".into());
            args.push(format!("scale=min({width},iw):-2"));
        }
        args.extend([
            "-movflags".into(),
            "+faststart".into(),
            "-c:a".into(),
            AUDIO_CODEC.into(),
            "-b:a".into(),
            AUDIO_BITRATE.into(),
            output.into(),
        ]);
        args
    }
}

/// Opaque binary payload with a declared media type.
///
/// Input assets are read-only throughout a run; output assets are owned by
/// the caller once returned.
#[derive(Debug, Clone)]
pub struct Asset {
    /// File name the asset was supplied (or produced) under
    pub name: String,
    /// Declared media type, e.g. `image/jpeg`
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of one compression run.
///
/// Constructed exactly once at run completion; `output_size ≤ original_size`
/// always holds at that point (the image path falls back to the original
/// asset when no attempt beats it).
#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    #[serde(skip)]
    pub output: Asset,
    #[serde(rename = "originalSize")]
    pub original_size: u64,
    #[serde(rename = "outputSize")]
    pub output_size: u64,
    #[serde(rename = "savedBytes")]
    pub saved_bytes: u64,
    #[serde(rename = "savedPercent")]
    pub saved_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preset_name_falls_back_to_small() {
        assert_eq!(Preset::from_name("same"), Preset::Same);
        assert_eq!(Preset::from_name("SMALLEST"), Preset::Smallest);
        assert_eq!(Preset::from_name("turbo"), Preset::Small);
        assert_eq!(Preset::from_name(""), Preset::Small);
    }

    #[test]
    fn preset_deserializes_with_fallback() {
        let p: Preset = serde_json::from_str("\"smallest\"").unwrap();
        assert_eq!(p, Preset::Smallest);
        let p: Preset = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(p, Preset::Small);
    }

    #[test]
    fn video_args_carry_fixed_flags_and_crf() {
        let params = VideoParams {
            crf: 28,
            max_width: Some(1080),
        };
        let args = params.to_args("input.mov", "output.mp4");
        assert_eq!(args[0..2], ["-i".to_string(), "input.mov".to_string()]);
        assert!(args.contains(&"yuv420p".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"28".to_string()));
        assert!(args.contains(&"veryfast".to_string()));
        assert!(args.contains(&"scale=min(1080,iw):-2".to_string()));
        assert!(args.contains(&"+faststart".to_string()));
        assert!(args.contains(&"128k".to_string()));
        assert_eq!(args.last().unwrap(), "output.mp4");
    }

    #[test]
    fn video_args_omit_scale_without_width_cap() {
        let params = VideoParams {
            crf: 23,
            max_width: None,
        };
        let args = params.to_args("input.mp4", "output.mp4");
        assert!(!args.contains(&"-vf".to_string()));
    }

    #[test]
    fn result_serializes_stats_without_payload() {
        let result = CompressionResult {
            output: Asset::new("a-shrink.jpg", "image/jpeg", vec![1, 2, 3]),
            original_size: 10,
            output_size: 3,
            saved_bytes: 7,
            saved_percent: 70,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["savedPercent"], 70);
        assert_eq!(value["originalSize"], 10);
        assert!(value.get("output").is_none());
    }
}
