//! File naming and byte formatting helpers shared by both compression paths.

use std::path::Path;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Default container extension when the input name carries none.
const DEFAULT_VIDEO_EXT: &str = "mp4";

/// Returns `true` when the mime hint names a format that is already heavily
/// compressed (HEIC/HEIF). Re-encoding such a source needs a lower quality
/// ceiling to hit the same size ratio.
pub fn is_high_compression_source(mime: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    mime == "image/heic" || mime == "image/heif"
}

/// Synthetic name under which an input asset is staged into the encoder's
/// virtual filesystem. Keeps the original extension (lowercased) so the
/// encoder can probe the container; falls back to `mp4`.
pub fn staged_input_name(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_VIDEO_EXT.to_string());
    format!("input.{ext}")
}

/// Output file name for a compressed asset: `{stem}-shrink.{ext}`.
pub fn shrink_output_name(file_name: &str, ext: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[..i],
        _ => file_name,
    };
    format!("{stem}-shrink.{ext}")
}

/// Renders a byte count the way the original UI did: whole KB below 1 MB,
/// one decimal of MB above (no decimal from 100 MB up).
pub fn format_bytes(bytes: u64) -> String {
    if bytes < MIB {
        let kb = (bytes as f64 / KIB as f64).round().max(1.0);
        format!("{kb:.0} KB")
    } else {
        let mb = bytes as f64 / MIB as f64;
        if mb >= 100.0 {
            format!("{mb:.0} MB")
        } else {
            format!("{mb:.1} MB")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_high_compression_sources() {
        assert!(is_high_compression_source("image/heic"));
        assert!(is_high_compression_source("image/HEIF"));
        assert!(!is_high_compression_source("image/jpeg"));
        assert!(!is_high_compression_source("image/png"));
    }

    #[test]
    fn staged_name_keeps_extension() {
        assert_eq!(staged_input_name("clip.MOV"), "input.mov");
        assert_eq!(staged_input_name("holiday.mp4"), "input.mp4");
    }

    #[test]
    fn staged_name_defaults_to_mp4() {
        assert_eq!(staged_input_name("noext"), "input.mp4");
        assert_eq!(staged_input_name("trailing."), "input.mp4");
    }

    #[test]
    fn output_name_appends_shrink_suffix() {
        assert_eq!(shrink_output_name("photo.heic", "jpg"), "photo-shrink.jpg");
        assert_eq!(shrink_output_name("clip.mov", "mp4"), "clip-shrink.mp4");
        assert_eq!(shrink_output_name("noext", "mp4"), "noext-shrink.mp4");
        // A leading dot is part of the name, not an extension separator
        assert_eq!(shrink_output_name(".hidden", "jpg"), ".hidden-shrink.jpg");
    }

    #[test]
    fn formats_bytes_like_the_display() {
        assert_eq!(format_bytes(500), "1 KB");
        assert_eq!(format_bytes(30 * 1024), "30 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(format_bytes(150 * 1024 * 1024), "150 MB");
    }
}
