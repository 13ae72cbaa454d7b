//! Configuration types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use merkledrop_core::BuildOptions;
use merkledrop_distributor::OutputOptions;
use merkledrop_logging::LogLevel;

use crate::{default_settings_path, Result, SettingsError};

/// Distributor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributorSettings {
    /// Hashing, ordering and duplicate handling
    #[serde(default)]
    pub build: BuildOptions,

    /// Output document encoding
    #[serde(default)]
    pub output: OutputOptions,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Path the settings were loaded from (not serialized)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

impl DistributorSettings {
    /// Load settings from a specific path, or create defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(SettingsError::ReadError)?;
            let mut settings: DistributorSettings =
                serde_json::from_str(&content).map_err(SettingsError::ParseError)?;
            settings.config_path = Some(path.to_path_buf());
            info!("Loaded settings from {:?}", path);
            Ok(settings)
        } else {
            let mut settings = Self::default();
            settings.config_path = Some(path.to_path_buf());
            Ok(settings)
        }
    }

    /// Save settings to the path they were loaded from
    pub fn save(&self) -> Result<()> {
        let path = self.config_path.clone().unwrap_or_else(default_settings_path);
        self.save_to(&path)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(SettingsError::CreateDirError)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(SettingsError::ParseError)?;
        std::fs::write(path, content).map_err(SettingsError::WriteError)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        self.build
    }

    pub fn output_options(&self) -> OutputOptions {
        self.output
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
