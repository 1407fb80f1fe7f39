//! Imported model slots
//!
//! Each slot is a directory named by its index holding one `params.json`.

pub mod model_info;
pub mod registry;

pub use model_info::{RvcModelSlot, PARAMS_FILE, RVC_VOICE_CHANGER_TYPE};
pub use registry::{
    load_all_model_slots, load_model_slot, params_path, parse_slot_index, save_model_slot,
    SlotRegistry,
};
