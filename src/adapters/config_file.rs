//! JSON file configuration adapter.
//!
//! Reads a [`StationConfig`] from a JSON document on disk. Fields the
//! document omits take their defaults; the result is validated before it
//! is handed out.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::StationConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and validate a JSON document.
    pub fn parse(text: &str) -> Result<StationConfig, ConfigError> {
        let config: StationConfig = serde_json::from_str(text).map_err(|e| {
            warn!("Config parse error: {}", e);
            ConfigError::Corrupted
        })?;
        config.validate().map_err(ConfigError::ValidationFailed)?;
        Ok(config)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<StationConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        debug!("Config: read {} bytes from {}", text.len(), self.path.display());
        Self::parse(&text)
    }
}

/// Configuration source that always yields a fixed value.
pub struct StaticConfig(pub StationConfig);

impl ConfigPort for StaticConfig {
    fn load(&self) -> Result<StationConfig, ConfigError> {
        self.0.validate().map_err(ConfigError::ValidationFailed)?;
        Ok(self.0.clone())
    }
}
