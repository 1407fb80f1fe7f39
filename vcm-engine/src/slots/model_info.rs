//! Imported RVC model metadata (`params.json`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Metadata file name inside each slot directory
pub const PARAMS_FILE: &str = "params.json";

/// Discriminator key identifying the record family
pub const VOICE_CHANGER_TYPE_KEY: &str = "voiceChangerType";

/// Older files carry the family tag here instead
pub const LEGACY_TYPE_KEY: &str = "modelType";

/// Family tag accepted by this registry
pub const RVC_VOICE_CHANGER_TYPE: &str = "RVC";

/// Keys derived from the file's location; never read from or written to disk
pub const CONTEXT_KEYS: [&str; 2] = ["slotIndex", "storageDir"];

/// Keys owned by the named fields of [`RvcModelSlot`]
pub const FIELD_KEYS: [&str; 18] = [
    "name",
    "description",
    "credit",
    "termsOfUseUrl",
    "iconFile",
    "modelFile",
    "modelFileOnnx",
    "indexFile",
    "isONNX",
    "modelType",
    "samplingRate",
    "f0",
    "embChannels",
    "embedder",
    "version",
    "defaultTune",
    "defaultIndexRatio",
    "defaultProtect",
];

/// Whether `key` may not be carried in [`RvcModelSlot::extra`]
pub fn is_reserved_key(key: &str) -> bool {
    key == VOICE_CHANGER_TYPE_KEY || CONTEXT_KEYS.contains(&key) || FIELD_KEYS.contains(&key)
}

/// One imported RVC model
///
/// `slot_index` and `storage_dir` come from where the record lives on disk
/// and are skipped by serde. Unrecognized keys are kept in `extra` and
/// written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RvcModelSlot {
    #[serde(skip)]
    pub slot_index: u32,
    #[serde(skip)]
    pub storage_dir: PathBuf,

    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_use_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_file: Option<String>,

    /// Model weights, relative to the slot directory or absolute
    pub model_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file_onnx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_file: Option<String>,
    #[serde(rename = "isONNX", default)]
    pub is_onnx: bool,

    /// RVC architecture tag, e.g. `pyTorchRVCv2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u32>,
    /// Whether the model was trained with pitch guidance
    #[serde(default = "default_f0")]
    pub f0: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emb_channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Default transpose (semitones)
    #[serde(default)]
    pub default_tune: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_index_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_protect: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_f0() -> bool {
    true
}

impl RvcModelSlot {
    pub fn new(
        slot_index: u32,
        storage_dir: impl Into<PathBuf>,
        name: impl Into<String>,
        model_file: impl Into<String>,
    ) -> Self {
        Self {
            slot_index,
            storage_dir: storage_dir.into(),
            name: name.into(),
            description: String::new(),
            credit: None,
            terms_of_use_url: None,
            icon_file: None,
            model_file: model_file.into(),
            model_file_onnx: None,
            index_file: None,
            is_onnx: false,
            model_type: None,
            sampling_rate: None,
            f0: default_f0(),
            emb_channels: None,
            embedder: None,
            version: None,
            default_tune: 0,
            default_index_ratio: None,
            default_protect: None,
            extra: Map::new(),
        }
    }

    /// Absolute path of the model weights (relative names hang off `storage_dir`)
    pub fn model_path(&self) -> PathBuf {
        self.storage_dir.join(&self.model_file)
    }

    /// Entries of `extra` that collide with the discriminator, the context
    /// keys or a named field
    pub fn reserved_extra_keys(&self) -> Vec<&str> {
        self.extra
            .keys()
            .map(String::as_str)
            .filter(|key| is_reserved_key(key))
            .collect()
    }

    /// Copy of the record with the reserved `extra` entries removed
    pub fn without_reserved_extra(&self) -> Self {
        let mut record = self.clone();
        record.extra.retain(|key, _| !is_reserved_key(key));
        record
    }

    /// ONNX export path, if the slot has one
    pub fn onnx_model_path(&self) -> Option<PathBuf> {
        self.model_file_onnx
            .as_ref()
            .map(|file| self.storage_dir.join(file))
    }
}

/// On-disk shape: discriminator followed by the record's own fields
#[derive(Serialize)]
pub(crate) struct ParamsFile<'a> {
    #[serde(rename = "voiceChangerType")]
    pub voice_changer_type: &'static str,
    #[serde(flatten)]
    pub record: &'a RvcModelSlot,
}

/// Parse a `params.json` body.
///
/// `Ok(None)` when the record belongs to another family (or has no tag).
/// `Err` when the body is not a JSON object or the RVC fields do not parse.
pub(crate) fn parse_params(contents: &str) -> Result<Option<RvcModelSlot>, serde_json::Error> {
    let mut value: Value = serde_json::from_str(contents)?;
    let Some(object) = value.as_object_mut() else {
        return Err(serde::de::Error::custom("params file is not a JSON object"));
    };

    let tag = match object.remove(VOICE_CHANGER_TYPE_KEY) {
        Some(tag) => tag,
        None => object.get(LEGACY_TYPE_KEY).cloned().unwrap_or(Value::Null),
    };
    if tag.as_str() != Some(RVC_VOICE_CHANGER_TYPE) {
        return Ok(None);
    }

    for key in CONTEXT_KEYS {
        object.remove(key);
    }

    serde_json::from_value(value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_foreign_tag_is_none() {
        let body = json!({"voiceChangerType": "None", "name": "TestSlot"}).to_string();
        assert_eq!(parse_params(&body).unwrap(), None);
    }

    #[test]
    fn test_parse_missing_tag_is_none() {
        let body = json!({"name": "x", "modelFile": "x.pth"}).to_string();
        assert_eq!(parse_params(&body).unwrap(), None);
    }

    #[test]
    fn test_parse_legacy_model_type_tag() {
        let body = json!({"modelType": "RVC", "name": "Old", "modelFile": "old.pth"}).to_string();
        let record = parse_params(&body).unwrap().unwrap();

        assert_eq!(record.name, "Old");
        assert_eq!(record.model_type.as_deref(), Some("RVC"));
    }

    #[test]
    fn test_parse_drops_context_keys_and_keeps_unknown() {
        let body = json!({
            "voiceChangerType": "RVC",
            "name": "A",
            "modelFile": "a.pth",
            "slotIndex": 9,
            "storageDir": "/elsewhere",
            "speakers": {"0": "target"}
        })
        .to_string();

        let record = parse_params(&body).unwrap().unwrap();

        assert_eq!(record.slot_index, 0);
        assert_eq!(record.storage_dir, PathBuf::new());
        assert!(!record.extra.contains_key("slotIndex"));
        assert!(!record.extra.contains_key("storageDir"));
        assert!(!record.extra.contains_key("voiceChangerType"));
        assert_eq!(record.extra["speakers"], json!({"0": "target"}));
    }

    #[test]
    fn test_parse_wrong_field_type_is_error() {
        let body = json!({
            "voiceChangerType": "RVC",
            "name": "A",
            "modelFile": "a.pth",
            "samplingRate": "fast"
        })
        .to_string();

        assert!(parse_params(&body).is_err());
    }

    #[test]
    fn test_parse_non_object_is_error() {
        assert!(parse_params("[1, 2, 3]").is_err());
        assert!(parse_params("not json").is_err());
    }

    #[test]
    fn test_defaults_for_absent_optional_fields() {
        let body = json!({"voiceChangerType": "RVC", "name": "A", "modelFile": "a.pth"}).to_string();
        let record = parse_params(&body).unwrap().unwrap();

        assert_eq!(record, RvcModelSlot::new(0, PathBuf::new(), "A", "a.pth"));
        assert!(record.f0);
        assert_eq!(record.sampling_rate, None);
    }

    #[test]
    fn test_serialized_form_has_tag_and_no_context() {
        let mut record = RvcModelSlot::new(4, "/models/4", "Four", "four.pth");
        record.sampling_rate = Some(40000);

        let value = serde_json::to_value(ParamsFile {
            voice_changer_type: RVC_VOICE_CHANGER_TYPE,
            record: &record,
        })
        .unwrap();

        assert_eq!(value["voiceChangerType"], "RVC");
        assert_eq!(value["samplingRate"], 40000);
        assert_eq!(value["isONNX"], false);
        assert!(value.get("slotIndex").is_none());
        assert!(value.get("storageDir").is_none());
        assert!(value.get("modelFileOnnx").is_none());
    }

    #[test]
    fn test_field_keys_match_serialized_fields() {
        let mut record = RvcModelSlot::new(0, "/models/0", "Full", "full.pth");
        record.description = "d".to_string();
        record.credit = Some("c".to_string());
        record.terms_of_use_url = Some("https://example.invalid/terms".to_string());
        record.icon_file = Some("icon.png".to_string());
        record.model_file_onnx = Some("full.onnx".to_string());
        record.index_file = Some("full.index".to_string());
        record.model_type = Some("pyTorchRVCv2".to_string());
        record.sampling_rate = Some(40000);
        record.emb_channels = Some(768);
        record.embedder = Some("hubert_base".to_string());
        record.version = Some("v2".to_string());
        record.default_index_ratio = Some(0.5);
        record.default_protect = Some(0.33);

        let value = serde_json::to_value(&record).unwrap();
        let mut serialized: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = FIELD_KEYS.to_vec();
        serialized.sort_unstable();
        expected.sort_unstable();

        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_reserved_extra_keys_are_detected_and_removed() {
        let mut record = RvcModelSlot::new(0, "/models/0", "A", "a.pth");
        record.extra.insert("storageDir".to_string(), json!("/elsewhere"));
        record.extra.insert("voiceChangerType".to_string(), json!("MMVC"));
        record.extra.insert("name".to_string(), json!("Shadow"));
        record.extra.insert("speakers".to_string(), json!({"0": "target"}));

        let mut reserved = record.reserved_extra_keys();
        reserved.sort_unstable();
        assert_eq!(reserved, vec!["name", "storageDir", "voiceChangerType"]);

        let cleaned = record.without_reserved_extra();
        assert_eq!(cleaned.extra.len(), 1);
        assert!(cleaned.extra.contains_key("speakers"));
        assert_eq!(cleaned.name, "A");
    }

    #[test]
    fn test_model_paths_resolve_against_storage_dir() {
        let mut record = RvcModelSlot::new(1, "/models/1", "One", "one.pth");
        record.model_file_onnx = Some("one.onnx".to_string());

        assert_eq!(record.model_path(), PathBuf::from("/models/1/one.pth"));
        assert_eq!(record.onnx_model_path(), Some(PathBuf::from("/models/1/one.onnx")));
    }
}
