//! Pitch extractor selection, construction and caching
//!
//! # Components
//! - **types** - The eight known identifiers and their backend table
//! - **extractor** - `PitchExtractor` / `BackendRuntime` traits, f0 range
//! - **factory** - Identifier → instance, with the fallback policy
//! - **runtime** - `LoaderRegistry`, a runtime built from per-variant loaders
//! - **manager** - Single-slot cache in front of the factory

pub mod extractor;
pub mod factory;
pub mod manager;
pub mod runtime;
pub mod types;

pub use extractor::{BackendRuntime, ExtractionError, PitchExtractor, PitchRequest, F0_MAX, F0_MIN};
pub use factory::{ConstructError, PitchExtractorFactory};
pub use manager::{LoadStats, PitchExtractorManager};
pub use runtime::{LoaderFn, LoaderRegistry};
pub use types::{BackendSpec, BackendVariant, PitchExtractorType, UnknownPitchExtractor};
