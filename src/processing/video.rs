//! Video transcode pipeline: stage, invoke, observe, retrieve, clean up.
//!
//! Single attempt per run, no size convergence: the CRF is preset-fixed and
//! the result is accepted as-is. Unlike the image path, an empty output is a
//! pipeline defect and fails the run; it is never downgraded to "return the
//! original".

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use super::encoder::{MediaEncoder, ProgressObserver};
use crate::core::{Asset, EncoderSession, Phase, ProgressSignal, ProgressSink, VideoParams};
use crate::utils::{shrink_output_name, staged_input_name, ShrinkError, ShrinkResult};

/// Staged name of every transcode output.
const OUTPUT_NAME: &str = "output.mp4";

/// Mime of every transcoded asset.
pub const VIDEO_OUTPUT_MIME: &str = "video/mp4";

pub struct VideoPipeline<E> {
    session: Arc<EncoderSession<E>>,
}

impl<E: MediaEncoder> VideoPipeline<E> {
    pub fn new(session: Arc<EncoderSession<E>>) -> Self {
        Self { session }
    }

    /// Transcodes `asset` with the preset-resolved `params`.
    ///
    /// Progress lands in `on_progress` as integer percents in `0..=99`,
    /// monotonically non-decreasing; 100 belongs to the caller surface.
    /// Staged input and output entries are removed on every exit path.
    pub async fn compress(
        &self,
        asset: &Asset,
        params: &VideoParams,
        on_progress: &ProgressSink,
    ) -> ShrinkResult<Asset> {
        let encoder = self.session.acquire().await?;
        let _run = self.session.begin_run().await;

        let input_name = staged_input_name(&asset.name);
        encoder.stage_file(&input_name, &asset.bytes).await?;

        let observer = percent_observer(on_progress.clone());
        let argv = params.to_args(&input_name, OUTPUT_NAME);

        let outcome = async {
            encoder.run(&argv, observer).await?;
            encoder.read_file(OUTPUT_NAME).await
        }
        .await;

        // Cleanup must run whether the transcode succeeded or raised.
        // Removal errors are swallowed; a missing output after a failed run
        // is the expected case.
        if let Err(e) = encoder.remove_file(&input_name).await {
            warn!(name = %input_name, error = %e, "staged input cleanup failed");
        }
        if let Err(e) = encoder.remove_file(OUTPUT_NAME).await {
            debug!(name = OUTPUT_NAME, error = %e, "staged output cleanup failed");
        }

        let bytes = outcome?;
        if bytes.is_empty() {
            return Err(ShrinkError::EmptyOutput);
        }

        Ok(Asset::new(
            shrink_output_name(&asset.name, "mp4"),
            VIDEO_OUTPUT_MIME,
            bytes,
        ))
    }
}

/// Translates fractional completion ratios into `Compressing` signals with
/// integer percents capped at 99 and forced non-decreasing within the run.
fn percent_observer(sink: ProgressSink) -> ProgressObserver {
    let high_water = AtomicU8::new(0);
    Arc::new(move |ratio: f64| {
        let percent = ((ratio.clamp(0.0, 1.0) * 100.0).floor() as u8).min(99);
        let previous = high_water.fetch_max(percent, Ordering::Relaxed);
        sink(ProgressSignal {
            percent: percent.max(previous),
            phase: Phase::Compressing,
        });
    })
}
