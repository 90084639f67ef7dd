//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON file.  A missing file
//! yields [`ExperimentConfig::default()`]; fields absent from the file keep
//! their defaults (`#[serde(default)]`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ExperimentConfig;

pub const DEFAULT_CONFIG_FILE: &str = "fishfood.json";

/// Environment variable that overrides [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV: &str = "FISHFOOD_CONFIG";

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `FISHFOOD_CONFIG`, or `fishfood.json` in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ExperimentConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at '{}', using defaults", self.path.display());
                return Ok(ExperimentConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config: ExperimentConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate().map_err(ConfigError::ValidationFailed)?;
        info!("Loaded config from '{}'", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &ExperimentConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::ValidationFailed)?;
        let text =
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
