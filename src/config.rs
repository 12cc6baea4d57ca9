//! Loading and saving [`FusionSettings`] as TOML
//!
//! Every key is optional; missing keys take their defaults.
//!
//! ```toml
//! dt = 0.0333333
//! alpha = 0.9
//! initial_orientation = [1.0, 0.0, 0.0, 0.0]
//! renormalize_interval = 30
//! ```

use std::path::Path;

use tracing::info;

use crate::error::ConfigError;
use crate::types::FusionSettings;

impl FusionSettings {
    /// Parse and validate settings from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: FusionSettings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load settings from `path`, or defaults if the file does not exist
pub fn load_settings(path: impl AsRef<Path>) -> Result<FusionSettings, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let settings = FusionSettings::from_toml_str(&contents)?;
        info!(?path, "Loaded fusion settings");
        Ok(settings)
    } else {
        info!(?path, "No settings file found, using defaults");
        Ok(FusionSettings::default())
    }
}

/// Validate and write settings to `path`
pub fn save_settings(path: impl AsRef<Path>, settings: &FusionSettings) -> Result<(), ConfigError> {
    let path = path.as_ref();
    settings.validate()?;
    std::fs::write(path, settings.to_toml_string()?)?;
    info!(?path, "Saved fusion settings");
    Ok(())
}
