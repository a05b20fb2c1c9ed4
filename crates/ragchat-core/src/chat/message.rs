//! Chat message types.
//!
//! Messages are immutable once created and are owned by the session list
//! (or the persisted conversation) they belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::{generate_id, now};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply from the remote assistant (including error replies).
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A citation returned by the chat backend alongside an assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Relevance score in `0.0..=1.0`.
    #[serde(default)]
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Source {
    pub fn new(filename: impl Into<String>, similarity: f64) -> Self {
        Self {
            filename: filename.into(),
            collection: None,
            similarity,
            url: None,
            tags: None,
        }
    }
}

/// A user-supplied file attached to one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    /// MIME type, e.g. `application/pdf`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Inline content as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            data: None,
            url: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// A single message in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    /// Creation time. Stored entries with a missing or malformed value load as "now".
    #[serde(default = "now", deserialize_with = "lenient_timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    fn build(role: MessageRole, content: String) -> Self {
        Self {
            id: generate_id(),
            role,
            content,
            timestamp: now(),
            sources: None,
            attachments: None,
            is_error: false,
        }
    }

    /// Creates a user message. An empty attachment list is stored as `None`.
    pub fn user(content: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        let mut message = Self::build(MessageRole::User, content.into());
        if !attachments.is_empty() {
            message.attachments = Some(attachments);
        }
        message
    }

    /// Creates an assistant reply carrying the backend's sources.
    pub fn assistant(content: impl Into<String>, sources: Vec<Source>) -> Self {
        let mut message = Self::build(MessageRole::Assistant, content.into());
        if !sources.is_empty() {
            message.sources = Some(sources);
        }
        message
    }

    /// Creates an assistant message flagged as an error.
    pub fn error(content: impl Into<String>) -> Self {
        let mut message = Self::build(MessageRole::Assistant, content.into());
        message.is_error = true;
        message
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn source_count(&self) -> usize {
        self.sources.as_ref().map_or(0, Vec::len)
    }
}

/// Accepts RFC 3339 strings, epoch milliseconds, or null.
///
/// Anything unparsable resolves to the current time.
pub(crate) mod lenient_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        let parsed = match raw {
            Some(Value::String(text)) => DateTime::parse_from_rfc3339(&text)
                .ok()
                .map(|at| at.with_timezone(&Utc)),
            Some(Value::Number(millis)) => millis
                .as_i64()
                .or_else(|| millis.as_f64().map(|f| f as i64))
                .and_then(DateTime::from_timestamp_millis),
            _ => None,
        };
        Ok(parsed.unwrap_or_else(Utc::now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_without_attachments() {
        let message = Message::user("hello", Vec::new());
        assert!(message.is_user());
        assert!(message.attachments.is_none());
        assert!(!message.is_error);
    }

    #[test]
    fn test_error_message_flagged() {
        let message = Message::error("boom");
        assert_eq!(message.role, MessageRole::Assistant);
        assert!(message.is_error);
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let mut message = Message::assistant("hi", vec![Source::new("handbook.pdf", 0.92)]);
        message.is_error = true;
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["isError"], true);
        assert_eq!(value["sources"][0]["filename"], "handbook.pdf");
        assert!(value.get("attachments").is_none());
    }

    #[test]
    fn test_is_error_omitted_when_false() {
        let value = serde_json::to_value(Message::user("x", Vec::new())).unwrap();
        assert!(value.get("isError").is_none());
    }

    #[test]
    fn test_attachment_type_field_name() {
        let attachment = Attachment::new("a.pdf", "application/pdf", 10);
        let value = serde_json::to_value(&attachment).unwrap();
        assert_eq!(value["type"], "application/pdf");
    }

    #[test]
    fn test_timestamp_accepts_rfc3339() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "role": "user",
            "content": "hi",
            "timestamp": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(message.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_timestamp_accepts_epoch_millis() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "role": "user",
            "content": "hi",
            "timestamp": 1_714_557_600_000i64
        }))
        .unwrap();
        assert_eq!(message.timestamp.timestamp_millis(), 1_714_557_600_000);
    }

    #[test]
    fn test_missing_or_garbage_timestamp_defaults_to_now() {
        let before = Utc::now();
        let missing: Message = serde_json::from_value(json!({
            "id": "1", "role": "assistant", "content": "hi"
        }))
        .unwrap();
        let garbage: Message = serde_json::from_value(json!({
            "id": "2", "role": "assistant", "content": "hi", "timestamp": "yesterday-ish"
        }))
        .unwrap();
        let null: Message = serde_json::from_value(json!({
            "id": "3", "role": "assistant", "content": "hi", "timestamp": null
        }))
        .unwrap();
        assert!(missing.timestamp >= before);
        assert!(garbage.timestamp >= before);
        assert!(null.timestamp >= before);
    }
}
