//! Conversation history domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Message;
use crate::chat::message::lenient_timestamp;
use crate::text::now;

/// A persisted, named snapshot of a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    /// Derived from the first user message.
    pub title: String,
    /// Derived from the first assistant message.
    pub preview: String,
    pub messages: Vec<Message>,
    #[serde(default = "now", deserialize_with = "lenient_timestamp::deserialize")]
    pub last_updated: DateTime<Utc>,
}

impl Conversation {
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            preview: self.preview.clone(),
            last_updated: self.last_updated,
            message_count: self.messages.len(),
        }
    }
}

/// Lightweight row for history listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub last_updated: DateTime<Utc>,
    pub message_count: usize,
}

/// Document produced by a history export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub timestamp: DateTime<Utc>,
    pub conversations: Vec<Conversation>,
}

impl HistoryExport {
    /// `chat-history-YYYY-MM-DDTHH-MM-SS.json`, sortable by time.
    pub fn file_name(&self) -> String {
        format!(
            "chat-history-{}.json",
            self.timestamp.format("%Y-%m-%dT%H-%M-%S")
        )
    }
}
