pub mod encoder;
pub mod estimate;
pub mod finalize;
pub mod image;
pub mod presets;
pub mod raster;
pub mod shrinker;
#[cfg(test)]
pub(crate) mod testing;
pub mod video;

pub use encoder::{FfmpegEncoder, MediaEncoder, ProgressObserver, FFMPEG_ENV};
pub use estimate::{estimate_output_bytes, ESTIMATE_FLOOR_BYTES};
pub use finalize::finalize;
pub use image::{ImageEngine, IMAGE_OUTPUT_MIME};
pub use presets::{resolve_image, resolve_video};
pub use raster::{JpegCodec, Raster, RasterCodec};
pub use shrinker::Shrinker;
pub use video::{VideoPipeline, VIDEO_OUTPUT_MIME};
