//! Slot directory persistence
//!
//! Layout: `<model_dir>/<slot_index>/params.json`. The directory name is the
//! only source of a record's slot index. Indices are sparse; a missing,
//! foreign or unreadable slot is simply absent from the results.

use super::model_info::{parse_params, ParamsFile, RvcModelSlot, PARAMS_FILE, RVC_VOICE_CHANGER_TYPE};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vcm_common::fs_utils::write_atomic;

/// Path of the metadata file inside a slot directory
pub fn params_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join(PARAMS_FILE)
}

/// Parse a directory name as a slot index.
///
/// Only canonical decimal forms are accepted (`"7"`, not `"07"` or `"+7"`),
/// so two directories can never claim the same index.
pub fn parse_slot_index(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u32 = name.parse().ok()?;
    (index.to_string() == name).then_some(index)
}

/// Load the RVC record stored in `storage_dir`.
///
/// Returns `None` if the directory or its `params.json` is missing, if the
/// record belongs to another model family, or if it cannot be read or parsed
/// (logged as a warning). `slot_index` and `storage_dir` are taken from the
/// arguments, never from the file.
pub fn load_model_slot(slot_index: u32, storage_dir: &Path) -> Option<RvcModelSlot> {
    let path = params_path(storage_dir);

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(slot = slot_index, "No {} in {}", PARAMS_FILE, storage_dir.display());
            return None;
        }
        Err(e) => {
            warn!(slot = slot_index, error = %e, "Cannot read {}, treating slot as empty", path.display());
            return None;
        }
    };

    match parse_params(&contents) {
        Ok(Some(mut record)) => {
            record.slot_index = slot_index;
            record.storage_dir = storage_dir.to_path_buf();
            Some(record)
        }
        Ok(None) => {
            debug!(slot = slot_index, "Skipping non-RVC record in {}", path.display());
            None
        }
        Err(e) => {
            warn!(slot = slot_index, error = %e, "Malformed {}, treating slot as empty", path.display());
            None
        }
    }
}

/// Load every RVC slot directly under `root_dir`, keyed by slot index.
///
/// Entries that are not directories, or whose names are not slot indices,
/// are skipped. A missing `root_dir` yields an empty map.
pub fn load_all_model_slots(root_dir: &Path) -> BTreeMap<u32, RvcModelSlot> {
    let mut slots = BTreeMap::new();

    let entries = match fs::read_dir(root_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Model directory {} does not exist", root_dir.display());
            return slots;
        }
        Err(e) => {
            warn!(error = %e, "Cannot list model directory {}", root_dir.display());
            return slots;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(slot_index) = entry.file_name().to_str().and_then(parse_slot_index) else {
            continue;
        };
        if let Some(record) = load_model_slot(slot_index, &path) {
            slots.insert(slot_index, record);
        }
    }

    debug!("Loaded {} model slots from {}", slots.len(), root_dir.display());
    slots
}

/// Write `record` to `record.storage_dir/params.json`, replacing any existing file.
///
/// Creates the directory if needed. Output is deterministic for a given
/// record. `extra` entries named like the discriminator, a context key or a
/// named field are dropped with a warning. All I/O and serialization failures
/// are returned to the caller.
pub fn save_model_slot(record: &RvcModelSlot) -> Result<()> {
    if record.storage_dir.as_os_str().is_empty() {
        return Err(Error::Common(vcm_common::Error::InvalidInput(format!(
            "slot {} has no storage directory",
            record.slot_index
        ))));
    }

    let cleaned;
    let reserved = record.reserved_extra_keys();
    let record = if reserved.is_empty() {
        record
    } else {
        warn!(
            slot = record.slot_index,
            keys = ?reserved,
            "Dropping extra keys that shadow reserved {} keys",
            PARAMS_FILE
        );
        cleaned = record.without_reserved_extra();
        &cleaned
    };

    let contents = serde_json::to_string_pretty(&ParamsFile {
        voice_changer_type: RVC_VOICE_CHANGER_TYPE,
        record,
    })?;

    fs::create_dir_all(&record.storage_dir)?;
    let path = params_path(&record.storage_dir);
    write_atomic(&path, contents.as_bytes())?;

    info!(slot = record.slot_index, "Saved model slot '{}' to {}", record.name, path.display());
    Ok(())
}

/// Slot persistence rooted at one model directory
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    model_dir: PathBuf,
}

impl SlotRegistry {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn slot_dir(&self, slot_index: u32) -> PathBuf {
        self.model_dir.join(slot_index.to_string())
    }

    pub fn load(&self, slot_index: u32) -> Option<RvcModelSlot> {
        load_model_slot(slot_index, &self.slot_dir(slot_index))
    }

    pub fn load_all(&self) -> BTreeMap<u32, RvcModelSlot> {
        load_all_model_slots(&self.model_dir)
    }

    /// Save into this registry's directory for `record.slot_index`.
    ///
    /// `record.storage_dir` is updated to that directory first.
    pub fn save(&self, record: &mut RvcModelSlot) -> Result<()> {
        record.storage_dir = self.slot_dir(record.slot_index);
        save_model_slot(record)
    }
}
