//! External encoder collaborator.
//!
//! The transcode pipeline depends only on the [`MediaEncoder`] shape: stage
//! bytes into an isolated virtual filesystem, run an argument list, read the
//! output back, remove entries. [`FfmpegEncoder`] backs that shape with a
//! real `ffmpeg` binary and a private staging directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::utils::{ShrinkError, ShrinkResult};

/// Observer receiving fractional completion ratios in `0..=1` during a run.
pub type ProgressObserver = Arc<dyn Fn(f64) + Send + Sync>;

/// Contract of the external transcoding engine.
///
/// Initialization is idempotent and attempted at most once concurrently
/// (enforced by [`crate::core::EncoderSession`], not by implementations).
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    async fn initialize(&self) -> ShrinkResult<()>;
    async fn stage_file(&self, name: &str, bytes: &[u8]) -> ShrinkResult<()>;
    async fn run(&self, argv: &[String], observer: ProgressObserver) -> ShrinkResult<()>;
    async fn read_file(&self, name: &str) -> ShrinkResult<Vec<u8>>;
    async fn remove_file(&self, name: &str) -> ShrinkResult<()>;
}

/// Environment variable naming the ffmpeg binary to use.
pub const FFMPEG_ENV: &str = "VIDSHRINK_FFMPEG";

/// Flags prepended to every invocation: quiet banner, machine-readable
/// progress on stdout, overwrite the staged output.
const BASE_ARGS: [&str; 6] = ["-hide_banner", "-nostdin", "-y", "-progress", "pipe:1", "-nostats"];

/// Number of trailing stderr lines kept for error messages.
const STDERR_TAIL_LINES: usize = 12;

/// `ffmpeg`-backed encoder.
///
/// Its virtual filesystem is a temporary directory created at
/// initialization and removed when the encoder is dropped; entry names are
/// restricted to single path components.
pub struct FfmpegEncoder {
    binary: PathBuf,
    staging: OnceCell<TempDir>,
}

impl FfmpegEncoder {
    /// Resolves the binary from [`FFMPEG_ENV`], falling back to `ffmpeg`
    /// on the search path.
    pub fn from_env() -> Self {
        let binary = std::env::var_os(FFMPEG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));
        Self::with_binary(binary)
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            staging: OnceCell::new(),
        }
    }

    fn staging_dir(&self) -> ShrinkResult<&Path> {
        self.staging
            .get()
            .map(TempDir::path)
            .ok_or_else(|| ShrinkError::encoder("encoder is not initialized"))
    }

    fn entry_path(&self, name: &str) -> ShrinkResult<PathBuf> {
        Ok(self.staging_dir()?.join(sanitized(name)?))
    }
}

/// Rejects names that would escape the staging directory.
fn sanitized(name: &str) -> ShrinkResult<&str> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ShrinkError::encoder(format!("invalid staging name: {name:?}")));
    }
    Ok(name)
}

/// Parses a `Duration: HH:MM:SS.cc` header line into microseconds.
fn parse_duration_line(line: &str) -> Option<u64> {
    let rest = line.trim_start().strip_prefix("Duration: ")?;
    let stamp = rest.split([',', ' ']).next()?;
    let mut parts = stamp.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    Some((hours * 3600 + minutes * 60) * 1_000_000 + (seconds * 1_000_000.0).round() as u64)
}

/// Parses an `out_time_us=N` progress line. The `out_time_ms` key is accepted
/// as the same unit: ffmpeg emits microseconds under both names.
fn parse_out_time_us(line: &str) -> Option<u64> {
    let value = line
        .strip_prefix("out_time_us=")
        .or_else(|| line.strip_prefix("out_time_ms="))?;
    value.trim().parse().ok()
}

#[async_trait]
impl MediaEncoder for FfmpegEncoder {
    async fn initialize(&self) -> ShrinkResult<()> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ShrinkError::encoder(format!(
                    "cannot launch '{}': {e}",
                    self.binary.display()
                ))
            })?;
        if !output.status.success() {
            return Err(ShrinkError::encoder(format!(
                "'{}' is not a working ffmpeg binary",
                self.binary.display()
            )));
        }
        let version = String::from_utf8_lossy(&output.stdout);
        debug!(version = %version.lines().next().unwrap_or(""), "encoder available");

        let dir = TempDir::new()
            .map_err(|e| ShrinkError::encoder(format!("cannot create staging directory: {e}")))?;
        // set() only fails when already initialized, which is fine
        let _ = self.staging.set(dir);
        Ok(())
    }

    async fn stage_file(&self, name: &str, bytes: &[u8]) -> ShrinkResult<()> {
        let path = self.entry_path(name)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(name, size = bytes.len(), "staged input");
        Ok(())
    }

    async fn run(&self, argv: &[String], observer: ProgressObserver) -> ShrinkResult<()> {
        let staging = self.staging_dir()?;
        let mut child = Command::new(&self.binary)
            .args(BASE_ARGS)
            .args(argv)
            .current_dir(staging)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ShrinkError::encoder(format!("failed to spawn ffmpeg: {e}")))?;

        debug!(?argv, "running encoder");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShrinkError::encoder("ffmpeg stdout unavailable"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ShrinkError::encoder("ffmpeg stderr unavailable"))?;

        // The total duration arrives on stderr before progress starts on
        // stdout; publish it so the progress loop can compute ratios.
        let duration_us = Arc::new(AtomicU64::new(0));
        let duration_writer = Arc::clone(&duration_us);
        let stderr_task = tokio::spawn(async move {
            let mut tail: Vec<String> = Vec::new();
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if duration_writer.load(Ordering::Relaxed) == 0 {
                    if let Some(us) = parse_duration_line(&line) {
                        duration_writer.store(us, Ordering::Relaxed);
                    }
                }
                if tail.len() == STDERR_TAIL_LINES {
                    tail.remove(0);
                }
                tail.push(line);
            }
            tail.join("\n")
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(us) = parse_out_time_us(&line) {
                let total = duration_us.load(Ordering::Relaxed);
                if total > 0 {
                    observer((us as f64 / total as f64).clamp(0.0, 1.0));
                }
            }
        }

        let status = child.wait().await?;
        let tail = stderr_task.await.unwrap_or_default();
        if !status.success() {
            return Err(ShrinkError::encoder(format!(
                "ffmpeg exited with {status}: {tail}"
            )));
        }
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ShrinkResult<Vec<u8>> {
        let path = self.entry_path(name)?;
        Ok(tokio::fs::read(&path).await?)
    }

    async fn remove_file(&self, name: &str) -> ShrinkResult<()> {
        let path = self.entry_path(name)?;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(name, error = %e, "failed to remove staged entry");
            return Err(e.into());
        }
        Ok(())
    }
}
