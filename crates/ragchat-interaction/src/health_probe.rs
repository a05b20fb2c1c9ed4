//! HttpHealthProbe - `GET {base}/health`.

use async_trait::async_trait;
use ragchat_core::config::ClientConfig;
use ragchat_core::connection::{ConnectionStatus, HealthProbe};
use ragchat_core::error::{RagChatError, Result};
use reqwest::{Client, header};

/// Any HTTP answer counts as reachable; only transport failures are `Offline`.
#[derive(Clone, Debug)]
pub struct HttpHealthProbe {
    client: Client,
    url: String,
}

impl HttpHealthProbe {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RagChatError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(client, config.endpoint_url(&config.health_endpoint)))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> ConnectionStatus {
        match self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => {
                let status = ConnectionStatus::from_http_status(response.status().as_u16());
                tracing::debug!("[Health] {} -> {} ({:?})", self.url, response.status(), status);
                status
            }
            Err(err) => {
                tracing::warn!("[Health] Health check failed: {}", err);
                ConnectionStatus::Offline
            }
        }
    }
}
