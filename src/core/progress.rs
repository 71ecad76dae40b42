//! Progress signals emitted toward the caller's display.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Phase of a run, carrying the human-readable label shown next to the
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Preparing,
    Compressing,
    Done,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preparing => "Preparing…",
            Self::Compressing => "Compressing…",
            Self::Done => "Done!",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One advisory progress update. Emitted many times per run, never retained.
///
/// Within a single run the percent is monotonically non-decreasing; the
/// pipeline caps at 99 and the caller surface alone emits the final 100,
/// only after output retrieval succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSignal {
    pub percent: u8,
    pub phase: Phase,
}

/// Fire-and-forget progress callback supplied by the caller.
pub type ProgressSink = Arc<dyn Fn(ProgressSignal) + Send + Sync>;

/// Sink that drops every signal, for callers without a display.
pub fn null_sink() -> ProgressSink {
    Arc::new(|_| {})
}
