//! Caller-facing surface: one asynchronous run per call, single completion
//! or failure.

use std::sync::Arc;

use tracing::info;

use super::encoder::{FfmpegEncoder, MediaEncoder};
use super::finalize::finalize;
use super::image::ImageEngine;
use super::presets::{resolve_image, resolve_video};
use super::raster::{JpegCodec, RasterCodec};
use super::video::VideoPipeline;
use crate::core::{
    Asset, CompressionResult, EncoderSession, Phase, Preset, ProgressSignal, ProgressSink,
};
use crate::utils::{format_bytes, ShrinkError, ShrinkResult};

/// Entry point combining both compression paths behind one injected
/// encoder session.
pub struct Shrinker<E, C> {
    images: ImageEngine<C>,
    videos: VideoPipeline<E>,
}

impl Shrinker<FfmpegEncoder, JpegCodec> {
    /// Production wiring: `ffmpeg` resolved from the environment, `image`
    /// crate raster codec.
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(EncoderSession::new(FfmpegEncoder::from_env())),
            JpegCodec,
        )
    }
}

impl Default for Shrinker<FfmpegEncoder, JpegCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> Shrinker<E, C>
where
    E: MediaEncoder + 'static,
    C: RasterCodec + 'static,
{
    pub fn with_parts(session: Arc<EncoderSession<E>>, codec: C) -> Self {
        Self {
            images: ImageEngine::new(codec),
            videos: VideoPipeline::new(session),
        }
    }

    /// Compresses a still image under the preset's byte budget.
    ///
    /// Never fails for size reasons; the result degrades to the original
    /// asset when no encode attempt beats it.
    pub async fn start_image_run(
        &self,
        asset: Asset,
        preset: Preset,
    ) -> ShrinkResult<CompressionResult> {
        let params = resolve_image(preset, &asset.mime);
        let original_size = asset.len();

        // The convergence loop is CPU-bound; keep it off the async runtime.
        let engine = self.images.clone();
        let output = tokio::task::spawn_blocking(move || engine.compress(&asset, &params))
            .await
            .map_err(|e| ShrinkError::processing(format!("image task panicked: {e}")))??;

        let result = finalize(original_size, output);
        info!(
            "{} compressed ({} saved / {}%)",
            result.output.name,
            format_bytes(result.saved_bytes),
            result.saved_percent
        );
        Ok(result)
    }

    /// Transcodes a video with the preset's fixed parameters.
    ///
    /// The final `{100, Done}` signal is emitted here, only after the
    /// pipeline retrieved a non-empty output.
    pub async fn start_video_run(
        &self,
        asset: Asset,
        preset: Preset,
        on_progress: ProgressSink,
    ) -> ShrinkResult<CompressionResult> {
        on_progress(ProgressSignal {
            percent: 0,
            phase: Phase::Preparing,
        });

        let params = resolve_video(preset);
        let original_size = asset.len();
        let output = self.videos.compress(&asset, &params, &on_progress).await?;

        on_progress(ProgressSignal {
            percent: 100,
            phase: Phase::Done,
        });

        let result = finalize(original_size, output);
        info!(
            "{} compressed ({} saved / {}%)",
            result.output.name,
            format_bytes(result.saved_bytes),
            result.saved_percent
        );
        Ok(result)
    }
}
