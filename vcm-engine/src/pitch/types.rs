//! Pitch extractor identifiers and the static backend table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Known pitch extractor identifiers
///
/// Wire form is the snake_case string (`"rmvpe_onnx"`). Strings outside
/// this set are not rejected by the loader; they select the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchExtractorType {
    CrepeFull,
    CrepeTiny,
    CrepeFullOnnx,
    CrepeTinyOnnx,
    Rmvpe,
    RmvpeOnnx,
    Fcpe,
    FcpeOnnx,
}

/// Backend implementation family an identifier is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendVariant {
    Crepe,
    CrepeOnnx,
    Rmvpe,
    RmvpeOnnx,
    Fcpe,
    FcpeOnnx,
}

impl PitchExtractorType {
    /// Extractor substituted for unknown identifiers and failed loads
    pub const FALLBACK: PitchExtractorType = PitchExtractorType::RmvpeOnnx;

    pub fn all() -> &'static [PitchExtractorType] {
        &[
            Self::CrepeFull,
            Self::CrepeTiny,
            Self::CrepeFullOnnx,
            Self::CrepeTinyOnnx,
            Self::Rmvpe,
            Self::RmvpeOnnx,
            Self::Fcpe,
            Self::FcpeOnnx,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrepeFull => "crepe_full",
            Self::CrepeTiny => "crepe_tiny",
            Self::CrepeFullOnnx => "crepe_full_onnx",
            Self::CrepeTinyOnnx => "crepe_tiny_onnx",
            Self::Rmvpe => "rmvpe",
            Self::RmvpeOnnx => "rmvpe_onnx",
            Self::Fcpe => "fcpe",
            Self::FcpeOnnx => "fcpe_onnx",
        }
    }

    /// Backend table: identifier → (variant, pretrained asset path)
    pub fn backend(&self) -> (BackendVariant, &'static str) {
        match self {
            Self::CrepeTiny => (BackendVariant::Crepe, "pretrain/crepe_tiny.pth"),
            Self::CrepeFull => (BackendVariant::Crepe, "pretrain/crepe_full.pth"),
            Self::CrepeTinyOnnx => (BackendVariant::CrepeOnnx, "pretrain/crepe_onnx_tiny.onnx"),
            Self::CrepeFullOnnx => (BackendVariant::CrepeOnnx, "pretrain/crepe_onnx_full.onnx"),
            Self::Rmvpe => (BackendVariant::Rmvpe, "pretrain/rmvpe.pt"),
            Self::RmvpeOnnx => (BackendVariant::RmvpeOnnx, "pretrain/rmvpe.onnx"),
            Self::Fcpe => (BackendVariant::Fcpe, "pretrain/fcpe.pt"),
            Self::FcpeOnnx => (BackendVariant::FcpeOnnx, "pretrain/fcpe.onnx"),
        }
    }

    pub fn variant(&self) -> BackendVariant {
        self.backend().0
    }

    /// Asset path relative to the assets root
    pub fn asset_path(&self) -> &'static Path {
        Path::new(self.backend().1)
    }
}

impl fmt::Display for PitchExtractorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the eight known identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPitchExtractor(pub String);

impl fmt::Display for UnknownPitchExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pitch extractor '{}'", self.0)
    }
}

impl std::error::Error for UnknownPitchExtractor {}

impl FromStr for PitchExtractorType {
    type Err = UnknownPitchExtractor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownPitchExtractor(s.to_string()))
    }
}

/// Everything a runtime needs to build one extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSpec {
    pub kind: PitchExtractorType,
    pub variant: BackendVariant,
    /// Asset path already resolved against the assets root
    pub asset_path: PathBuf,
}

impl BackendSpec {
    pub fn resolve(kind: PitchExtractorType, assets_root: &Path) -> Self {
        Self {
            kind,
            variant: kind.variant(),
            asset_path: assets_root.join(kind.asset_path()),
        }
    }
}
