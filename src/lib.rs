//! Size-targeted media compression.
//!
//! Reduces a user-supplied image or video to fit under an approximate byte
//! target determined by a quality [`Preset`], preserving acceptable fidelity
//! and guaranteeing the result is never larger than the input. Images go
//! through an iterative quality/dimension convergence search; videos go
//! through a staged transcode pipeline around an external encoder.
//!
//! ```no_run
//! use vidshrink::{Asset, Preset, Shrinker};
//!
//! # async fn run() -> vidshrink::ShrinkResult<()> {
//! let shrinker = Shrinker::new();
//! let photo = Asset::new("photo.jpg", "image/jpeg", std::fs::read("photo.jpg")?);
//! let result = shrinker.start_image_run(photo, Preset::Small).await?;
//! assert!(result.output_size <= result.original_size);
//! # Ok(())
//! # }
//! ```

// Module declarations in dependency order
pub mod core;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use core::{
    null_sink, Asset, CompressionResult, EncoderSession, ImageParams, Phase, Preset,
    ProgressSignal, ProgressSink, VideoParams,
};
pub use processing::{
    estimate_output_bytes, finalize, resolve_image, resolve_video, FfmpegEncoder, ImageEngine,
    JpegCodec, MediaEncoder, Raster, RasterCodec, Shrinker, VideoPipeline,
};
pub use utils::{ShrinkError, ShrinkResult};
