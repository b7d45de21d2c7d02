//! Configuration sources.
//!
//! Implements [`ConfigPort`] twice:
//!
//! - [`BuiltinConfig`]: the compiled-in defaults (firmware).
//! - [`JsonConfigFile`]: a JSON file read once at startup (simulation).
//!   Missing fields fall back to their defaults.
//!
//! Both validate before returning; nothing is ever clamped into range.
//! [`load_config`] is what the binaries call: it lifts the port error into
//! the crate-wide [`Error`].

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;
use crate::error::{self, Error};

/// Load and validate through `port`.
pub fn load_config(port: &impl ConfigPort) -> error::Result<SystemConfig> {
    port.load().map_err(|e| {
        warn!("config: load failed: {}", e);
        Error::from(e)
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinConfig;

impl ConfigPort for BuiltinConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let cfg = SystemConfig::default();
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
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
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let cfg: SystemConfig = serde_json::from_str(&text).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("config: loaded {}", self.path.display());
        Ok(cfg)
    }
}
