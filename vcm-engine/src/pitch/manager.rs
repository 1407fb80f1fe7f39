//! Single-slot pitch extractor cache
//!
//! Holds at most one live extractor. States: empty, or holding the
//! extractor built for one identifier.
//!
//! - `get(id, false)` while holding `id`: reuse, nothing is constructed.
//! - Any other `get`: construct through the factory (with fallback) and
//!   replace the held extractor. The old one is dropped.
//!
//! The manager is mutated through `&mut self`; hosts sharing one across
//! threads wrap it in a `Mutex` so loads are serialized.

use super::extractor::PitchExtractor;
use super::factory::PitchExtractorFactory;
use super::types::PitchExtractorType;
use crate::error::{Error, Result};
use tracing::info;

/// Counters distinguishing the reuse path from the construction path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Calls served from the cached extractor
    pub reused: u64,
    /// Calls that constructed a new extractor
    pub loaded: u64,
}

pub struct PitchExtractorManager {
    factory: PitchExtractorFactory,
    current: Option<Box<dyn PitchExtractor>>,
    stats: LoadStats,
}

impl PitchExtractorManager {
    pub fn new(factory: PitchExtractorFactory) -> Self {
        Self {
            factory,
            current: None,
            stats: LoadStats::default(),
        }
    }

    /// Return the extractor for `identifier`, loading it if needed.
    ///
    /// `identifier` may be any string; unknown ones resolve to the fallback
    /// extractor. Only fails when the fallback itself cannot be loaded, in
    /// which case the previously cached extractor is kept.
    pub fn get(&mut self, identifier: &str, force_reload: bool) -> Result<&mut dyn PitchExtractor> {
        let reusable = !force_reload
            && self
                .current
                .as_ref()
                .is_some_and(|cached| cached.kind().as_str() == identifier);

        if reusable {
            info!("Reusing pitch extractor {}", identifier);
            self.stats.reused += 1;
        } else {
            info!("Loading pitch extractor {}", identifier);
            let extractor = self.factory.construct(identifier)?;
            self.current = Some(extractor);
            self.stats.loaded += 1;
        }

        self.current
            .as_deref_mut()
            .map(|extractor| extractor as &mut dyn PitchExtractor)
            .ok_or_else(|| Error::Internal("pitch extractor slot empty after load".to_string()))
    }

    /// Identifier of the held extractor, if any
    pub fn current_kind(&self) -> Option<PitchExtractorType> {
        self.current.as_ref().map(|e| e.kind())
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn factory(&self) -> &PitchExtractorFactory {
        &self.factory
    }
}
