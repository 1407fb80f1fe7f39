//! Pitch extractor trait and the backend construction boundary
//!
//! The numeric f0 estimation lives behind [`PitchExtractor`]; this crate only
//! selects, builds and caches implementations. Concrete backends (CREPE,
//! RMVPE, FCPE, each as PyTorch or ONNX) are supplied by the host through a
//! [`BackendRuntime`].

use super::types::{BackendSpec, PitchExtractorType};
use thiserror::Error;

/// Lowest fundamental frequency reported by extractors (Hz)
pub const F0_MIN: f32 = 50.0;

/// Highest fundamental frequency reported by extractors (Hz)
pub const F0_MAX: f32 = 1100.0;

/// Parameters for one extraction call
#[derive(Debug, Clone, PartialEq)]
pub struct PitchRequest {
    /// Sample rate of the input audio (Hz)
    pub sample_rate: u32,
    /// Samples per analysis frame step
    pub hop_length: usize,
    /// Transpose in semitones applied to the estimated f0
    pub f0_up_key: f32,
    pub f0_min: f32,
    pub f0_max: f32,
}

impl Default for PitchRequest {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            hop_length: 160,
            f0_up_key: 0.0,
            f0_min: F0_MIN,
            f0_max: F0_MAX,
        }
    }
}

impl PitchRequest {
    /// Frequency multiplier for `f0_up_key` (12 semitones per octave)
    pub fn transpose_ratio(&self) -> f32 {
        2f32.powf(self.f0_up_key / 12.0)
    }
}

/// Extraction error
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input audio unusable (empty, wrong rate, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The inference runtime failed while running the model
    #[error("Inference error: {0}")]
    Inference(String),
}

/// A loaded pitch extraction backend
///
/// # Example
/// ```rust,ignore
/// struct RmvpeOnnx { session: ort::session::Session }
///
/// impl PitchExtractor for RmvpeOnnx {
///     fn kind(&self) -> PitchExtractorType { PitchExtractorType::RmvpeOnnx }
///
///     fn extract(&mut self, audio: &[f32], request: &PitchRequest)
///         -> Result<Vec<f32>, ExtractionError> {
///         // run the session, return one f0 value per hop
///     }
/// }
/// ```
pub trait PitchExtractor: Send {
    /// Identifier this instance was built for
    ///
    /// The cache compares it against requested identifiers to decide reuse.
    fn kind(&self) -> PitchExtractorType;

    /// Estimate f0 (Hz, 0.0 for unvoiced) for each `hop_length` frame of `audio`
    fn extract(
        &mut self,
        audio: &[f32],
        request: &PitchRequest,
    ) -> Result<Vec<f32>, ExtractionError>;
}

/// Builds extractors from a [`BackendSpec`]
///
/// Errors are opaque runtime failures (missing or corrupt asset, incompatible
/// runtime). The factory catches them and applies the fallback policy.
pub trait BackendRuntime: Send + Sync {
    fn load(&self, spec: &BackendSpec) -> anyhow::Result<Box<dyn PitchExtractor>>;
}
