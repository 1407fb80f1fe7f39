//! Loader registry: a [`BackendRuntime`] assembled from per-variant loaders
//!
//! Hosts register one loader per [`BackendVariant`] they can run (e.g. only
//! the ONNX variants on a machine without PyTorch). Requests for an
//! unregistered variant, or for an asset file that is not on disk, fail
//! like any other load error and so end up on the fallback extractor.

use super::extractor::{BackendRuntime, PitchExtractor};
use super::types::{BackendSpec, BackendVariant};
use anyhow::{bail, Context};
use std::collections::HashMap;

/// Builds one extractor from a resolved spec
pub type LoaderFn =
    Box<dyn Fn(&BackendSpec) -> anyhow::Result<Box<dyn PitchExtractor>> + Send + Sync>;

pub struct LoaderRegistry {
    loaders: HashMap<BackendVariant, LoaderFn>,
    check_assets: bool,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
            check_assets: true,
        }
    }

    /// Register (or replace) the loader for `variant`
    pub fn register<F>(mut self, variant: BackendVariant, loader: F) -> Self
    where
        F: Fn(&BackendSpec) -> anyhow::Result<Box<dyn PitchExtractor>> + Send + Sync + 'static,
    {
        self.loaders.insert(variant, Box::new(loader));
        self
    }

    /// Let loaders see specs whose asset file does not exist.
    ///
    /// For runtimes that fetch or embed their weights.
    pub fn without_asset_check(mut self) -> Self {
        self.check_assets = false;
        self
    }

    pub fn is_registered(&self, variant: BackendVariant) -> bool {
        self.loaders.contains_key(&variant)
    }
}

impl BackendRuntime for LoaderRegistry {
    fn load(&self, spec: &BackendSpec) -> anyhow::Result<Box<dyn PitchExtractor>> {
        let Some(loader) = self.loaders.get(&spec.variant) else {
            bail!("no loader registered for {:?} backends", spec.variant);
        };

        if self.check_assets && !spec.asset_path.is_file() {
            bail!("pretrained asset not found: {}", spec.asset_path.display());
        }

        loader(spec).with_context(|| format!("{:?} loader failed for {}", spec.variant, spec.kind))
    }
}
