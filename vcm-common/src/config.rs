//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a small TOML file. Every field is
//! optional; a missing file is not an error, the compiled defaults are used
//! instead and a warning is logged.
//!
//! # Root folder priority
//!
//! 1. `VCM_ROOT_FOLDER` environment variable
//! 2. `VCM_ROOT` environment variable
//! 3. `root_folder` key of the TOML config file
//! 4. OS-dependent compiled default

use crate::fs_utils::write_atomic;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "VCM_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ROOT_ENV: &str = "VCM_ROOT";

/// Default slot directory name under the root folder
pub const DEFAULT_MODEL_DIR: &str = "model_dir";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder (optional, see [`RootFolderResolver`])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pitch extractor settings
    #[serde(default)]
    pub pitch: PitchConfig,

    /// Model slot settings
    #[serde(default)]
    pub slots: SlotsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Pitch extractor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchConfig {
    /// Directory the pretrained asset paths (`pretrain/...`) are resolved against.
    ///
    /// Defaults to the root folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_root: Option<PathBuf>,
}

/// Model slot settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotsConfig {
    /// Directory holding `<slot_index>/params.json` entries.
    ///
    /// Defaults to `<root>/model_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Directory pretrained pitch extractor assets are resolved against
    pub fn assets_root(&self, root_folder: &Path) -> PathBuf {
        self.pitch
            .assets_root
            .clone()
            .unwrap_or_else(|| root_folder.to_path_buf())
    }

    /// Directory holding the model slots
    pub fn model_dir(&self, root_folder: &Path) -> PathBuf {
        self.slots
            .model_dir
            .clone()
            .unwrap_or_else(|| root_folder.join(DEFAULT_MODEL_DIR))
    }
}

/// Load TOML configuration from `path`.
///
/// A missing file yields the defaults with a warning. A file that exists but
/// does not parse is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            );
            return Ok(TomlConfig::default());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let config: TomlConfig = toml::from_str(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write TOML configuration to `path` atomically (temp file + rename).
///
/// On Unix the file is restricted to owner read/write (0600).
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    write_atomic(path, content.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Compiled defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
        }
    }
}

/// Resolves the root folder following the priority order in the module docs
pub struct RootFolderResolver {
    module_name: String,
    config_path: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            config_path: default_config_path(),
        }
    }

    /// Use an explicit config file instead of the platform config location
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn resolve(&self) -> PathBuf {
        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    debug!(module = %self.module_name, "Root folder from {}", var);
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(config_path) = &self.config_path {
            if let Ok(config) = load_toml_config(config_path) {
                if let Some(root_folder) = config.root_folder {
                    debug!(module = %self.module_name, "Root folder from {}", config_path.display());
                    return root_folder;
                }
            }
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Platform config file location (`<config dir>/vcm/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vcm").join("config.toml"))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/vcm
        dirs::data_local_dir()
            .map(|d| d.join("vcm"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/vcm"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/vcm
        dirs::data_dir()
            .map(|d| d.join("vcm"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/vcm"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\vcm
        dirs::data_local_dir()
            .map(|d| d.join("vcm"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\vcm"))
    } else {
        PathBuf::from("./vcm_data")
    }
}
