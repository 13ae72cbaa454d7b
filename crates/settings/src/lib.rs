//! MerkleDrop Settings
//!
//! Persisted distributor configuration.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use merkledrop_settings::DistributorSettings;
//! use merkledrop_core::IndexOrder;
//!
//! // Load settings, or defaults when the file does not exist yet
//! let mut settings = DistributorSettings::load_from(Path::new("merkledrop.json"))?;
//!
//! settings.build.index_order = IndexOrder::FirstOccurrence;
//! settings.save()?;
//! # Ok::<(), merkledrop_settings::SettingsError>(())
//! ```

mod config;

pub use config::DistributorSettings;

use std::path::PathBuf;

use thiserror::Error;

/// File name used when no settings path was given
pub const DEFAULT_SETTINGS_FILE: &str = "merkledrop.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    ReadError(std::io::Error),

    #[error("Failed to write settings: {0}")]
    WriteError(std::io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(serde_json::Error),

    #[error("Failed to create config directory: {0}")]
    CreateDirError(std::io::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Settings file in the working directory
pub fn default_settings_path() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_FILE)
}
