//! Identifier → extractor construction with fallback
//!
//! Policy:
//! - Unknown identifier: warn, build [`PitchExtractorType::FALLBACK`].
//! - Known identifier fails to load: log the cause at error level, build the fallback.
//! - Fallback fails to load: return [`Error::PitchExtractorUnavailable`]. No second fallback.

use super::extractor::{BackendRuntime, PitchExtractor};
use super::types::{BackendSpec, PitchExtractorType};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A single failed construction attempt
#[derive(Debug, thiserror::Error)]
#[error("failed to load {kind} from {}: {source:#}", .asset_path.display())]
pub struct ConstructError {
    pub kind: PitchExtractorType,
    pub asset_path: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

/// Maps identifiers to freshly constructed extractors
#[derive(Clone)]
pub struct PitchExtractorFactory {
    runtime: Arc<dyn BackendRuntime>,
    assets_root: PathBuf,
}

impl PitchExtractorFactory {
    /// `assets_root` is the directory the table's `pretrain/...` paths hang off
    pub fn new(runtime: Arc<dyn BackendRuntime>, assets_root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            assets_root: assets_root.into(),
        }
    }

    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    pub fn spec_for(&self, kind: PitchExtractorType) -> BackendSpec {
        BackendSpec::resolve(kind, &self.assets_root)
    }

    /// Build exactly `kind`, without any fallback
    pub fn try_construct(
        &self,
        kind: PitchExtractorType,
    ) -> std::result::Result<Box<dyn PitchExtractor>, ConstructError> {
        let spec = self.spec_for(kind);
        debug!(
            kind = %kind,
            variant = ?spec.variant,
            asset = %spec.asset_path.display(),
            "Constructing pitch extractor"
        );

        let extractor = self.runtime.load(&spec).map_err(|source| ConstructError {
            kind,
            asset_path: spec.asset_path.clone(),
            source,
        })?;

        // The cache trusts kind() for reuse decisions
        if extractor.kind() != kind {
            return Err(ConstructError {
                kind,
                asset_path: spec.asset_path,
                source: anyhow::anyhow!(
                    "runtime returned a {} extractor for a {} request",
                    extractor.kind(),
                    kind
                ),
            });
        }

        Ok(extractor)
    }

    /// Build the extractor for `identifier`, applying the fallback policy
    pub fn construct(&self, identifier: &str) -> Result<Box<dyn PitchExtractor>> {
        let kind = match identifier.parse::<PitchExtractorType>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(
                    "Pitch extractor not found: {}. Fallback to {}",
                    identifier,
                    PitchExtractorType::FALLBACK
                );
                return self.construct_fallback(identifier);
            }
        };

        match self.try_construct(kind) {
            Ok(extractor) => Ok(extractor),
            Err(e) => {
                error!(
                    error = %e,
                    "Failed to load {}. Fallback to {}",
                    identifier,
                    PitchExtractorType::FALLBACK
                );
                self.construct_fallback(identifier)
            }
        }
    }

    fn construct_fallback(&self, identifier: &str) -> Result<Box<dyn PitchExtractor>> {
        self.try_construct(PitchExtractorType::FALLBACK)
            .map_err(|source| Error::PitchExtractorUnavailable {
                identifier: identifier.to_string(),
                source,
            })
    }
}
