//! # VCM Common Library
//!
//! Shared code for the voice-conversion engine crates:
//! - Configuration loading (TOML bootstrap file, root folder resolution)
//! - Logging initialization
//! - Atomic file writes
//! - Common error types

pub mod config;
pub mod error;
pub mod fs_utils;
pub mod logging;

pub use error::{Error, Result};
