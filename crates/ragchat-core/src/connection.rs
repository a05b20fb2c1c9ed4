//! Backend reachability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of the latest health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// Health endpoint answered with a 2xx status.
    Online,
    /// Health endpoint answered, but not with a 2xx status.
    Limited,
    /// Transport-level failure.
    Offline,
}

impl ConnectionStatus {
    /// Maps an HTTP status code to `Online` or `Limited`.
    pub fn from_http_status(code: u16) -> Self {
        if (200..300).contains(&code) {
            ConnectionStatus::Online
        } else {
            ConnectionStatus::Limited
        }
    }

    /// True when the backend answered at all.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Online | ConnectionStatus::Limited)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Connecting",
            ConnectionStatus::Online => "Online",
            ConnectionStatus::Limited => "Limited",
            ConnectionStatus::Offline => "Offline",
        }
    }
}

/// Probes the backend's health endpoint once.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> ConnectionStatus;
}
