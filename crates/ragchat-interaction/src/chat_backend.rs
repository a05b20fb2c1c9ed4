//! HttpChatBackend - JSON over HTTP implementation of [`ChatBackend`].

use async_trait::async_trait;
use ragchat_core::chat::{ChatBackend, ChatReply, ChatRequest};
use ragchat_core::config::ClientConfig;
use ragchat_core::error::{RagChatError, Result};
use reqwest::{Client, StatusCode, header};

use crate::response::normalize;

/// Posts chat requests to `{api_base_url}{chat_endpoint}`.
#[derive(Clone, Debug)]
pub struct HttpChatBackend {
    client: Client,
    url: String,
}

impl HttpChatBackend {
    /// Creates a backend posting to an absolute URL with a caller-supplied client.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Builds a client with the configured request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RagChatError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(client, config.endpoint_url(&config.chat_endpoint)))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
        tracing::debug!(
            "[HttpChatBackend] POST {} ({} messages, {} attachments)",
            self.url,
            request.messages.len(),
            request.attachments.as_ref().map_or(0, Vec::len)
        );

        let response = self
            .client
            .post(&self.url)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| RagChatError::network(None, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                "[HttpChatBackend] Chat request failed with {}: {}",
                status,
                body_text
            );
            return Err(map_http_error(status));
        }

        let body = response
            .text()
            .await
            .map_err(|err| RagChatError::network(Some(status.as_u16()), err.to_string()))?;
        normalize(&body)
    }
}

fn map_http_error(status: StatusCode) -> RagChatError {
    let reason = status.canonical_reason().unwrap_or("Unknown status");
    RagChatError::network(Some(status.as_u16()), reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_joins_endpoint() {
        let config = ClientConfig {
            api_base_url: "https://kb.example.org/api/".to_string(),
            ..ClientConfig::default()
        };
        let backend = HttpChatBackend::from_config(&config).unwrap();
        assert_eq!(backend.url(), "https://kb.example.org/api/chat/web");
    }

    #[test]
    fn test_http_error_message() {
        let err = map_http_error(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
