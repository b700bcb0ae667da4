//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the default
//! attribution settings from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AttributionConfig, SettingsFile};

/// Loads and provides access to the default attribution settings.
///
/// The settings file mirrors the administrative settings screen:
///
/// ```text
/// tier2_enabled: true
/// tier3_enabled: true
/// tier4_enabled: true
/// tier5_enabled: true
/// overtime_enabled: false
/// equity_window: custom
/// equity_window_days: 10
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_attribution::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/attribution.yaml").unwrap();
/// println!("Overtime enabled: {}", loader.config().overtime_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AttributionConfig,
}

impl ConfigLoader {
    /// Loads settings from the specified YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file cannot be read, or
    /// `ConfigParseError` if it is not valid YAML, contains unknown keys, or
    /// names an unknown equity window.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml(&content, &path_str)
    }

    /// Parses settings from YAML text; `origin` labels errors.
    pub fn from_yaml(content: &str, origin: &str) -> EngineResult<Self> {
        let settings: SettingsFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let config = settings
            .into_config()
            .map_err(|message| EngineError::ConfigParseError {
                path: origin.to_string(),
                message,
            })?;

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AttributionConfig) -> Self {
        Self { config }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }
}
