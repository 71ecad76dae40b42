//! Image convergence engine: iterative quality/dimension search toward a
//! byte budget.
//!
//! The engine never fails for size reasons. Its worst case returns the
//! original asset unchanged; only a decode failure is fatal.

use std::sync::Arc;

use tracing::{debug, warn};

use super::raster::RasterCodec;
use crate::core::{Asset, ImageParams};
use crate::utils::{format_bytes, shrink_output_name, ShrinkResult};

/// Mime of every compressed image the engine emits.
pub const IMAGE_OUTPUT_MIME: &str = "image/jpeg";

/// Margin subtracted from the input size so the target is strictly smaller
/// even when the ratio alone would not make it so.
const TARGET_MARGIN_BYTES: u64 = 20 * 1024;

/// Quality decrement per descent step.
const QUALITY_STEP: f32 = 0.05;

/// Extra quality drop applied by the single corrective pass.
const CORRECTIVE_QUALITY_DROP: f32 = 0.10;

/// Linear shrink factor of the corrective pass.
const CORRECTIVE_SCALE: f64 = 0.9;

pub struct ImageEngine<C> {
    codec: Arc<C>,
}

impl<C> Clone for ImageEngine<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
        }
    }
}

/// Steps quality down by `by`, clamped to `floor`. Rounding to whole percents
/// keeps repeated f32 subtraction from drifting past the floor comparison.
fn step_down(quality: f32, by: f32, floor: f32) -> f32 {
    (((quality - by) * 100.0).round() / 100.0).max(floor)
}

impl<C: RasterCodec> ImageEngine<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    /// Converges an in-memory JPEG encode of `asset` on the byte budget
    /// derived from `params`.
    ///
    /// Monotone linear quality descent from the already-rendered raster; one
    /// corrective 10% shrink when the descent alone cannot beat the original;
    /// final guard returns the original verbatim rather than ever emitting an
    /// equal-or-larger result.
    pub fn compress(&self, asset: &Asset, params: &ImageParams) -> ShrinkResult<Asset> {
        let source = self.codec.decode(&asset.bytes)?;
        let input_size = asset.len();

        let (mut width, mut height) = (source.width, source.height);
        if let Some(cap) = params.max_dimension {
            if width > cap {
                let factor = cap as f64 / width as f64;
                width = cap;
                height = ((source.height as f64) * factor).round().max(1.0) as u32;
            }
        }

        // Clamped to at least 1 byte: a sub-20 KiB input would otherwise
        // collapse the target to zero and break the comparison below.
        let target_bytes = ((input_size as f64 * params.target_ratio).round() as u64)
            .min(input_size.saturating_sub(TARGET_MARGIN_BYTES))
            .max(1);

        debug!(
            name = %asset.name,
            input = %format_bytes(input_size),
            target = %format_bytes(target_bytes),
            width,
            height,
            "starting convergence"
        );

        // Render once; every quality step re-encodes this raster without
        // re-decoding or re-scaling.
        let mut raster = if (width, height) == (source.width, source.height) {
            source.clone()
        } else {
            self.codec.scale(&source, width, height)?
        };

        let mut quality = params.q_start;
        let mut encoded = self.codec.encode(&raster, quality)?;
        while encoded.len() as u64 > target_bytes && quality > params.q_min {
            quality = step_down(quality, QUALITY_STEP, params.q_min);
            encoded = self.codec.encode(&raster, quality)?;
            debug!(quality, size = encoded.len(), "re-encoded");
        }

        if encoded.len() as u64 >= input_size {
            // One corrective pass. Shrinking is skipped when the dimension
            // cap already bit, so scale-downs never compound.
            let cap_applied = params
                .max_dimension
                .is_some_and(|cap| source.width > cap);
            if !cap_applied {
                width = ((width as f64) * CORRECTIVE_SCALE).round().max(1.0) as u32;
                height = ((height as f64) * CORRECTIVE_SCALE).round().max(1.0) as u32;
                raster = self.codec.scale(&source, width, height)?;
            }
            quality = step_down(quality, CORRECTIVE_QUALITY_DROP, params.q_min);
            encoded = self.codec.encode(&raster, quality)?;
            debug!(quality, size = encoded.len(), "corrective pass");
        }

        // Equal size counts as failure to improve.
        if encoded.is_empty() || encoded.len() as u64 >= input_size {
            warn!(name = %asset.name, "no attempt beat the original; returning it verbatim");
            return Ok(asset.clone());
        }

        Ok(Asset::new(
            shrink_output_name(&asset.name, "jpg"),
            IMAGE_OUTPUT_MIME,
            encoded,
        ))
    }
}
