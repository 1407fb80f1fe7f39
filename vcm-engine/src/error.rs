//! Error types for vcm-engine
//!
//! Only two paths surface errors to callers: a pitch extractor whose fallback
//! also failed to load, and a slot save that could not be written. Everything
//! else degrades (fallback extractor, absent slot) and is reported via logs.

use crate::pitch::ConstructError;
use thiserror::Error;

/// Main error type for vcm-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the requested nor the fallback pitch extractor could be loaded
    #[error("Pitch extractor unavailable (requested '{identifier}'): {source}")]
    PitchExtractorUnavailable {
        identifier: String,
        #[source]
        source: ConstructError,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot metadata could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// vcm-common error
    #[error("Common error: {0}")]
    Common(#[from] vcm_common::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using vcm-engine Error
pub type Result<T> = std::result::Result<T, Error>;
