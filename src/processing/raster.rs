//! Raster codec collaborator: decode, scale and JPEG-encode in memory.
//!
//! The convergence engine depends only on the [`RasterCodec`] shape; the
//! production implementation maps it onto the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageBuffer, RgbImage};

use crate::utils::{ShrinkError, ShrinkResult};

/// Decoded raster: packed RGB8, row-major.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Bitmap collaborator contract the image engine converges against.
pub trait RasterCodec: Send + Sync {
    /// Decodes an encoded image into a raster. Failure is fatal for the run.
    fn decode(&self, bytes: &[u8]) -> ShrinkResult<Raster>;

    /// Renders the raster at new dimensions, aspect handled by the caller.
    fn scale(&self, raster: &Raster, width: u32, height: u32) -> ShrinkResult<Raster>;

    /// Encodes the raster as JPEG. `quality` is a fraction in (0, 1].
    fn encode(&self, raster: &Raster, quality: f32) -> ShrinkResult<Vec<u8>>;
}

/// Production codec backed by the `image` crate.
pub struct JpegCodec;

impl JpegCodec {
    fn buffer(raster: &Raster) -> ShrinkResult<RgbImage> {
        ImageBuffer::from_raw(raster.width, raster.height, raster.pixels.clone()).ok_or_else(
            || {
                ShrinkError::processing(format!(
                    "raster buffer does not match {}×{}",
                    raster.width, raster.height
                ))
            },
        )
    }
}

impl RasterCodec for JpegCodec {
    fn decode(&self, bytes: &[u8]) -> ShrinkResult<Raster> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ShrinkError::decode(format!("failed to decode raster: {e}")))?;
        let rgb = decoded.to_rgb8();
        Ok(Raster {
            width: rgb.width(),
            height: rgb.height(),
            pixels: rgb.into_raw(),
        })
    }

    fn scale(&self, raster: &Raster, width: u32, height: u32) -> ShrinkResult<Raster> {
        let buffer = Self::buffer(raster)?;
        let scaled = image::imageops::resize(&buffer, width, height, FilterType::CatmullRom);
        Ok(Raster {
            width,
            height,
            pixels: scaled.into_raw(),
        })
    }

    fn encode(&self, raster: &Raster, quality: f32) -> ShrinkResult<Vec<u8>> {
        let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, q)
            .encode(
                &raster.pixels,
                raster.width,
                raster.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ShrinkError::processing(format!("JPEG encode failed: {e}")))?;
        Ok(out)
    }
}
