//! Error types for the compression engine.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the compression engine.
///
/// All fatal conditions bubble to the caller as one of these variants with a
/// human-readable message. None of them is retried by the core.
#[derive(Error, Debug, Serialize)]
pub enum ShrinkError {
    /// External encoder unavailable, failed to initialize, or failed mid-run
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// Corrupt or unsupported raster input
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transcode completed procedurally but produced zero bytes.
    /// Distinct from size-insufficiency, which is never an error.
    #[error("Encoding produced an empty file")]
    EmptyOutput,

    /// Raster encode or task execution failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    Io(String),
}

/// Convenience result type for compression operations.
pub type ShrinkResult<T> = Result<T, ShrinkError>;

// Helper methods for error creation
impl ShrinkError {
    pub fn encoder<T: Into<String>>(msg: T) -> Self {
        Self::Encoder(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }
}

// Convert std::io::Error to ShrinkError
impl From<io::Error> for ShrinkError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
