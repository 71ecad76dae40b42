//! Core types and session management.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`Preset`], [`ImageParams`], [`VideoParams`]: preset tiers and resolved parameters
//! - [`Asset`]: opaque media payload
//! - [`CompressionResult`]: result of one run
//! - [`ProgressSignal`]: transient progress updates
//! - [`EncoderSession`]: session-scoped encoder lifecycle

mod progress;
mod session;
mod types;

pub use progress::{null_sink, Phase, ProgressSignal, ProgressSink};
pub use session::EncoderSession;
pub use types::{
    Asset, CompressionResult, ImageParams, Preset, VideoParams, AUDIO_BITRATE, AUDIO_CODEC,
    PIXEL_FORMAT, SPEED_PRESET, VIDEO_CODEC,
};
