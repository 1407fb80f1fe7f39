//! Shared fixtures for vcm-engine integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use vcm_engine::pitch::{
    BackendRuntime, BackendSpec, ExtractionError, PitchExtractor, PitchExtractorFactory,
    PitchExtractorManager, PitchExtractorType, PitchRequest,
};

/// Extractor that reports a constant pitch so calls are observable
pub struct MockExtractor {
    kind: PitchExtractorType,
}

impl MockExtractor {
    pub fn new(kind: PitchExtractorType) -> Self {
        Self { kind }
    }
}

impl PitchExtractor for MockExtractor {
    fn kind(&self) -> PitchExtractorType {
        self.kind
    }

    fn extract(
        &mut self,
        audio: &[f32],
        request: &PitchRequest,
    ) -> Result<Vec<f32>, ExtractionError> {
        if audio.is_empty() {
            return Err(ExtractionError::InvalidInput("empty audio".to_string()));
        }
        let frames = audio.len().div_ceil(request.hop_length);
        Ok(vec![220.0 * request.transpose_ratio(); frames])
    }
}

/// Runtime that counts load attempts and fails for selected kinds
#[derive(Default)]
pub struct CountingRuntime {
    attempts: AtomicUsize,
    failing: Mutex<HashSet<PitchExtractorType>>,
    loaded: Mutex<Vec<PitchExtractorType>>,
}

impl CountingRuntime {
    pub fn fail(&self, kind: PitchExtractorType) {
        self.failing.lock().unwrap().insert(kind);
    }

    /// Every load attempt, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Kinds successfully built, in order
    pub fn loaded(&self) -> Vec<PitchExtractorType> {
        self.loaded.lock().unwrap().clone()
    }
}

impl BackendRuntime for CountingRuntime {
    fn load(&self, spec: &BackendSpec) -> anyhow::Result<Box<dyn PitchExtractor>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&spec.kind) {
            anyhow::bail!("onnxruntime: cannot open {}", spec.asset_path.display());
        }
        self.loaded.lock().unwrap().push(spec.kind);
        Ok(Box::new(MockExtractor::new(spec.kind)))
    }
}

pub fn counting_manager() -> (PitchExtractorManager, Arc<CountingRuntime>) {
    let runtime = Arc::new(CountingRuntime::default());
    let factory = PitchExtractorFactory::new(runtime.clone(), "/opt/vcm");
    (PitchExtractorManager::new(factory), runtime)
}

/// Address of the extractor behind a trait object, for identity checks
pub fn instance_addr(extractor: &dyn PitchExtractor) -> usize {
    extractor as *const dyn PitchExtractor as *const () as usize
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber and return its log output
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
