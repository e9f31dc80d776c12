//! Engine settings.
//!
//! Settings are optional: a missing config file yields [`EngineConfig::default`].
//! The default location is `<config dir>/ringbuilder/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder-ring.jpg";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://example.com/ring-builder";
pub const DEFAULT_CLIPBOARD_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Image shown when a product has no imagery at all
    pub placeholder_image: String,
    /// Page address share links are built on
    pub share_base_url: String,
    /// Upper bound for a single clipboard write attempt
    pub clipboard_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            clipboard_timeout_ms: DEFAULT_CLIPBOARD_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    pub fn clipboard_timeout(&self) -> Duration {
        Duration::from_millis(self.clipboard_timeout_ms)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

/// Load settings from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = EngineConfig::from_toml_str(&content)?;
    info!("Loaded engine config from {:?}", path);
    Ok(config)
}

/// `<config dir>/ringbuilder/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ringbuilder").join("config.toml"))
}

/// Load settings from an explicit path, or from the default location when it
/// exists, or fall back to defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(EngineConfig::default()),
    }
}
