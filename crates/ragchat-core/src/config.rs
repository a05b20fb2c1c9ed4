//! Client configuration model.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::RequestContext;

/// Root of `config.toml`.
///
/// Every field has a default so a partial (or empty) file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the chat backend, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    /// Path of the chat endpoint relative to `api_base_url`.
    pub chat_endpoint: String,
    /// Path of the health endpoint relative to `api_base_url`.
    pub health_endpoint: String,
    pub health_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub toast_duration_ms: u64,
    pub max_results: u32,
    pub strict_mode: bool,
    pub platform: String,
    /// Overrides the directory used for persisted client state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            chat_endpoint: "/chat/web".to_string(),
            health_endpoint: "/health".to_string(),
            health_interval_secs: 30,
            request_timeout_secs: 60,
            toast_duration_ms: 5000,
            max_results: 5,
            strict_mode: true,
            platform: "web".to_string(),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn request_context(&self) -> RequestContext {
        RequestContext {
            platform: self.platform.clone(),
            max_results: self.max_results,
            strict_mode: self.strict_mode,
        }
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Joins `api_base_url` and an endpoint path with exactly one slash.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(r#"api_base_url = "https://chat.example.com/api/""#).unwrap();
        assert_eq!(config.chat_endpoint, "/chat/web");
        assert_eq!(config.health_interval_secs, 30);
        assert_eq!(
            config.endpoint_url(&config.chat_endpoint),
            "https://chat.example.com/api/chat/web"
        );
    }

    #[test]
    fn test_request_context_from_config() {
        let config = ClientConfig {
            max_results: 3,
            strict_mode: false,
            ..ClientConfig::default()
        };
        let context = config.request_context();
        assert_eq!(context.max_results, 3);
        assert!(!context.strict_mode);
        assert_eq!(context.platform, "web");
    }
}
