//! Unified path management for RagChat files.
//!
//! ```text
//! ~/.config/ragchat/           # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/ragchat/      # Data directory (or the configured override)
//! └── storage/                 # Key-value store (settings, history)
//!     ├── rag-chat-settings.json
//!     ├── rag-chat-conversations.json
//!     └── rag-chat-current.json
//!
//! ~/Downloads/                 # History exports
//! ```

use std::path::PathBuf;

use thiserror::Error;

const APP_DIR: &str = "ragchat";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// No platform directory could be determined.
    #[error("Cannot determine {0} directory")]
    DirNotFound(&'static str),
}

/// Resolves every on-disk location the client uses.
///
/// A data directory override (from `config.toml`, the environment, or the
/// command line) replaces the platform data directory entirely.
#[derive(Debug, Clone, Default)]
pub struct RagChatPaths {
    data_dir_override: Option<PathBuf>,
}

impl RagChatPaths {
    pub fn new(data_dir_override: Option<PathBuf>) -> Self {
        Self { data_dir_override }
    }

    /// Returns the configuration directory (e.g. `~/.config/ragchat/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the data directory, honoring the override.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.data_dir_override {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    /// Returns the directory backing the key-value store.
    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("storage"))
    }

    /// Returns the directory history exports are written to.
    ///
    /// Falls back to `<data_dir>/exports` on systems without a downloads folder.
    pub fn downloads_dir(&self) -> Result<PathBuf, PathError> {
        match dirs::download_dir() {
            Some(dir) => Ok(dir),
            None => Ok(self.data_dir()?.join("exports")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        // Headless CI may have no home directory at all
        let Ok(config_dir) = RagChatPaths::config_dir() else {
            return;
        };
        assert!(config_dir.ends_with("ragchat"));
        let config_file = RagChatPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_data_dir_override() {
        let paths = RagChatPaths::new(Some(PathBuf::from("/tmp/ragchat-test")));
        assert_eq!(paths.data_dir().unwrap(), PathBuf::from("/tmp/ragchat-test"));
        assert_eq!(
            paths.storage_dir().unwrap(),
            PathBuf::from("/tmp/ragchat-test/storage")
        );
    }

    #[test]
    fn test_default_data_dir() {
        let paths = RagChatPaths::default();
        if let Ok(data_dir) = paths.data_dir() {
            assert!(data_dir.ends_with("ragchat"));
            assert!(paths.storage_dir().unwrap().ends_with("storage"));
        }
    }
}
