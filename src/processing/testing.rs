//! Scripted collaborator doubles shared by the processing tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::encoder::{MediaEncoder, ProgressObserver};
use super::raster::{Raster, RasterCodec};
use crate::utils::{ShrinkError, ShrinkResult};

type SizeFn = Box<dyn Fn(f32, &Raster) -> usize + Send + Sync>;

/// Routes engine tracing to the test writer; honors `RUST_LOG`.
pub(crate) fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Codec whose encoded size is a pure function of quality and raster,
/// counting every call the engine makes.
pub(crate) struct MockCodec {
    pub source: Raster,
    pub fail_decode: bool,
    pub size_for: SizeFn,
    pub encode_calls: AtomicUsize,
    pub scale_calls: AtomicUsize,
    pub last_scaled: Mutex<Option<(u32, u32)>>,
}

impl MockCodec {
    pub fn new(width: u32, height: u32, size_for: SizeFn) -> Self {
        Self {
            source: Raster {
                width,
                height,
                pixels: vec![0; (width * height * 3) as usize],
            },
            fail_decode: false,
            size_for,
            encode_calls: AtomicUsize::new(0),
            scale_calls: AtomicUsize::new(0),
            last_scaled: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        let mut codec = Self::new(1, 1, Box::new(|_, _| 0));
        codec.fail_decode = true;
        codec
    }
}

impl RasterCodec for MockCodec {
    fn decode(&self, _bytes: &[u8]) -> ShrinkResult<Raster> {
        if self.fail_decode {
            return Err(ShrinkError::decode("unsupported raster"));
        }
        Ok(self.source.clone())
    }

    fn scale(&self, _raster: &Raster, width: u32, height: u32) -> ShrinkResult<Raster> {
        self.scale_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_scaled.lock().unwrap() = Some((width, height));
        Ok(Raster {
            width,
            height,
            pixels: vec![0; (width * height * 3) as usize],
        })
    }

    fn encode(&self, raster: &Raster, quality: f32) -> ShrinkResult<Vec<u8>> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0u8; (self.size_for)(quality, raster)])
    }
}

/// Encoder with an in-memory virtual filesystem and a scripted run.
pub(crate) struct MockEncoder {
    pub fs: Mutex<HashMap<String, Vec<u8>>>,
    pub init_calls: AtomicUsize,
    pub fail_init: bool,
    pub fail_run: bool,
    /// Bytes `run` writes under `output.mp4` on success.
    pub output: Vec<u8>,
    /// Completion ratios delivered to the observer during `run`.
    pub ratios: Vec<f64>,
    /// Argument list of the most recent `run`.
    pub last_argv: Mutex<Vec<String>>,
}

impl MockEncoder {
    pub fn producing(output: Vec<u8>) -> Self {
        Self {
            fs: Mutex::new(HashMap::new()),
            init_calls: AtomicUsize::new(0),
            fail_init: false,
            fail_run: false,
            output,
            ratios: Vec::new(),
            last_argv: Mutex::new(Vec::new()),
        }
    }

    pub fn staged_names(&self) -> Vec<String> {
        self.fs.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl MediaEncoder for MockEncoder {
    async fn initialize(&self) -> ShrinkResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(ShrinkError::encoder("wrapper unavailable"));
        }
        Ok(())
    }

    async fn stage_file(&self, name: &str, bytes: &[u8]) -> ShrinkResult<()> {
        self.fs
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn run(&self, argv: &[String], observer: ProgressObserver) -> ShrinkResult<()> {
        *self.last_argv.lock().unwrap() = argv.to_vec();
        for ratio in &self.ratios {
            observer(*ratio);
        }
        if self.fail_run {
            return Err(ShrinkError::encoder("transcode failed"));
        }
        let output_name = argv.last().cloned().unwrap_or_default();
        self.fs
            .lock()
            .unwrap()
            .insert(output_name, self.output.clone());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ShrinkResult<Vec<u8>> {
        self.fs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ShrinkError::encoder(format!("no such staged file: {name}")))
    }

    async fn remove_file(&self, name: &str) -> ShrinkResult<()> {
        self.fs.lock().unwrap().remove(name);
        Ok(())
    }
}
