//! Engine session state
//!
//! Owns the pitch extractor cache and the slot registry for one voice
//! conversion session. Nothing here is process-global: two contexts hold
//! two independent extractor caches.

use crate::error::Result;
use crate::pitch::{BackendRuntime, PitchExtractor, PitchExtractorFactory, PitchExtractorManager};
use crate::slots::SlotRegistry;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use vcm_common::config::TomlConfig;

pub struct EngineContext {
    pub pitch: PitchExtractorManager,
    pub slots: SlotRegistry,
}

impl EngineContext {
    pub fn new(pitch: PitchExtractorManager, slots: SlotRegistry) -> Self {
        Self { pitch, slots }
    }

    /// Build from bootstrap config; asset and slot paths default under `root_folder`
    pub fn from_config(
        config: &TomlConfig,
        root_folder: &Path,
        runtime: Arc<dyn BackendRuntime>,
    ) -> Self {
        let assets_root = config.assets_root(root_folder);
        let model_dir = config.model_dir(root_folder);
        info!(
            "Engine context: assets {}, model slots {}",
            assets_root.display(),
            model_dir.display()
        );

        let factory = PitchExtractorFactory::new(runtime, assets_root);
        Self::new(PitchExtractorManager::new(factory), SlotRegistry::new(model_dir))
    }

    /// Shorthand for `self.pitch.get(identifier, force_reload)`
    pub fn pitch_extractor(
        &mut self,
        identifier: &str,
        force_reload: bool,
    ) -> Result<&mut dyn PitchExtractor> {
        self.pitch.get(identifier, force_reload)
    }
}
