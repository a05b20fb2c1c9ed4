//! Contract consumed from the remote chat backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::message::{Attachment, Message, MessageRole, Source};
use crate::error::Result;

/// Wire form of a message: role and text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for ApiMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Side-channel hints sent with every chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub platform: String,
    pub max_results: u32,
    pub strict_mode: bool,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            platform: "web".to_string(),
            max_results: 5,
            strict_mode: true,
        }
    }
}

/// Body of `POST {base}/chat/web`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ApiMessage>,
    pub context: RequestContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// Normalized reply from the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    pub content: String,
    pub sources: Vec<Source>,
    pub search_collections: Vec<String>,
}

impl ChatReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// An abstract chat backend.
///
/// Implementations return `RagChatError::Network` for transport failures and
/// non-success statuses, and `RagChatError::InvalidResponse` for payloads that
/// do not match the expected schema.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply>;
}
