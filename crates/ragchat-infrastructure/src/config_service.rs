//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/ragchat/config.toml`, creating the
//! file with defaults when it is missing, then layers environment overrides
//! on top.

use std::fs;
use std::path::{Path, PathBuf};

use ragchat_core::config::ClientConfig;
use ragchat_core::error::{RagChatError, Result};

use crate::paths::RagChatPaths;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "RAGCHAT_API_URL";
/// Overrides `data_dir`.
pub const ENV_DATA_DIR: &str = "RAGCHAT_DATA_DIR";

/// Loads and saves the client configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Service bound to the platform default `config.toml`.
    pub fn new() -> Result<Self> {
        let path = RagChatPaths::config_file().map_err(|e| RagChatError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Service bound to an explicit file (`--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, writing a default one first if it does not exist.
    ///
    /// Environment overrides are applied to the returned value only; they are
    /// never written back.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            if content.trim().is_empty() {
                ClientConfig::default()
            } else {
                toml::from_str(&content)?
            }
        } else {
            let default_config = ClientConfig::default();
            if let Err(e) = self.save(&default_config) {
                // A read-only config dir must not prevent startup
                tracing::warn!("[Config] Failed to write default config to {:?}: {}", self.path, e);
            } else {
                tracing::info!("[Config] Created default config at {:?}", self.path);
            }
            default_config
        };

        Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let toml_string = toml::to_string_pretty(config)?;
        fs::write(&self.path, toml_string)?;
        Ok(())
    }
}

/// Applies `RAGCHAT_API_URL` and `RAGCHAT_DATA_DIR` using `lookup` to read variables.
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("[Config] {} overrides api_base_url", ENV_API_URL);
        config.api_base_url = url.trim().to_string();
    }
    if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("[Config] {} overrides data_dir", ENV_DATA_DIR);
        config.data_dir = Some(PathBuf::from(dir.trim()));
    }
    config
}
