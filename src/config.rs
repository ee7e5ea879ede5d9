//! Table Configuration
//!
//! Server location and loading parameters, persisted as TOML in the
//! configuration directory.

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_MINIMUM_BATCH_SIZE, DEFAULT_SERVER_URL, DEFAULT_THRESHOLD,
    SERVER_URL_ENV,
};
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Paper table configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// TKB server base URL
    pub server_url: String,
    /// Smallest range the viewport loader requests
    pub minimum_batch_size: usize,
    /// Rows scanned beyond each edge of the visible window
    pub threshold: usize,
    /// Transport timeout for one page request; none by default
    pub page_timeout_secs: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            minimum_batch_size: DEFAULT_MINIMUM_BATCH_SIZE,
            threshold: DEFAULT_THRESHOLD,
            page_timeout_secs: None,
        }
    }
}

impl TableConfig {
    /// Parse a configuration; an empty document yields the defaults
    pub fn from_toml_str(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the loader cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(Error::Invalid {
                message: "server_url must not be empty".to_string(),
            });
        }
        if self.minimum_batch_size == 0 {
            return Err(Error::Invalid {
                message: "minimum_batch_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Replace the server URL when an override is given
    pub fn with_server_override(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = url;
        }
        self
    }
}

/// Get the configuration file path
fn get_config_path() -> Result<PathBuf> {
    let config_dir = get_or_create_config_dir()?;
    let path = config_dir.join(CONFIG_FILE_NAME);

    #[cfg(debug_assertions)]
    info!("Config file: {}", path.display());

    Ok(path)
}

/// Load the configuration, falling back to defaults when no file exists
///
/// `TKB_SERVER_URL` overrides the configured server URL.
pub fn load_config() -> Result<TableConfig> {
    let path = get_config_path()?;
    let config = if path.exists() {
        TableConfig::from_toml_str(&std::fs::read_to_string(&path)?)?
    } else {
        TableConfig::default()
    };

    Ok(config.with_server_override(std::env::var(SERVER_URL_ENV).ok()))
}

/// Save the configuration
pub fn save_config(config: &TableConfig) -> Result<()> {
    config.validate()?;
    let path = get_config_path()?;
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(())
}
