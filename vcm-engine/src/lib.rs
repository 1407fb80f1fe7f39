//! vcm-engine - Voice conversion component loading
//!
//! Two independent pieces:
//! - **pitch** - Selects, builds and caches one pitch extractor backend,
//!   falling back to `rmvpe_onnx` for unknown identifiers or failed loads
//! - **slots** - Loads and saves imported RVC model metadata stored as
//!   `<model_dir>/<slot_index>/params.json`
//!
//! `EngineContext` bundles both for a session.

pub mod context;
pub mod error;
pub mod pitch;
pub mod slots;

pub use crate::context::EngineContext;
pub use crate::error::{Error, Result};
