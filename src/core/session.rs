//! Session-scoped encoder lifecycle.
//!
//! The external encoder is a process-wide resource: expensive to bring up,
//! reused across runs, and never initialized twice concurrently. This module
//! wraps it in an explicit session object injected into the components that
//! need it, instead of a bare "is it ready" flag.

use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::debug;

use crate::processing::encoder::MediaEncoder;
use crate::utils::ShrinkResult;

/// Guards one encoder instance for the lifetime of a caller session.
///
/// `acquire` performs the one-time initialization behind a cell: concurrent
/// first callers rendezvous on it, later callers take the cheap ready path.
/// A failed initialization is not cached; the next `acquire` retries it.
pub struct EncoderSession<E> {
    encoder: E,
    ready: OnceCell<()>,
    run_lock: Mutex<()>,
}

impl<E: MediaEncoder> EncoderSession<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            ready: OnceCell::new(),
            run_lock: Mutex::new(()),
        }
    }

    /// Returns the initialized encoder, initializing it on first use.
    pub async fn acquire(&self) -> ShrinkResult<&E> {
        self.ready
            .get_or_try_init(|| async {
                debug!("initializing media encoder");
                self.encoder.initialize().await
            })
            .await?;
        Ok(&self.encoder)
    }

    /// Serializes transcode runs against the shared encoder instance.
    /// A second run waits here rather than invoking the encoder concurrently.
    pub async fn begin_run(&self) -> MutexGuard<'_, ()> {
        self.run_lock.lock().await
    }
}
