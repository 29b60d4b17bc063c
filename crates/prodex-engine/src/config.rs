//! Service configuration.
//!
//! Defaults live in code; a TOML file can override them.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

fn default_db_path() -> String {
    "prodex.db".to_string()
}

fn default_page_size() -> u32 {
    20
}

/// Configuration for the revision service and its storage.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// History page size used when the caller passes 0
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            default_page_size: default_page_size(),
        }
    }
}

/// Failure loading or parsing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ServiceConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML or
    /// does not match the config shape.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load a TOML config file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
