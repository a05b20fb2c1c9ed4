//! Normalization of chat response payloads.
//!
//! Deployed backends answer in one of three shapes:
//!
//! ```text
//! { "message": { "content": "..." }, "context": { "documentsUsed": [...], "searchCollections": [...] } }
//! { "message": "..." }
//! { "response": "..." }
//! ```
//!
//! Anything else is rejected with [`RagChatError::InvalidResponse`].

use ragchat_core::chat::{ChatReply, Source};
use ragchat_core::error::{RagChatError, Result};
use serde::Deserialize;

/// Shown when the backend answers with an empty message.
pub(crate) const EMPTY_REPLY_FALLBACK: &str =
    "I apologize, but I couldn't process your request properly.";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChatResponse {
    Structured {
        message: StructuredMessage,
        #[serde(default)]
        context: Option<ResponseContext>,
    },
    Flat {
        message: String,
        #[serde(default)]
        context: Option<ResponseContext>,
    },
    Legacy {
        response: String,
    },
}

#[derive(Debug, Deserialize)]
struct StructuredMessage {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseContext {
    #[serde(default)]
    documents_used: Option<Vec<Source>>,
    #[serde(default)]
    search_collections: Option<Vec<String>>,
}

impl From<RawChatResponse> for ChatReply {
    fn from(raw: RawChatResponse) -> Self {
        let (content, context) = match raw {
            RawChatResponse::Structured { message, context } => (message.content, context),
            RawChatResponse::Flat { message, context } => (message, context),
            RawChatResponse::Legacy { response } => (response, None),
        };
        let context = context.unwrap_or_default();

        let content = if content.trim().is_empty() {
            EMPTY_REPLY_FALLBACK.to_string()
        } else {
            content
        };

        ChatReply {
            content,
            sources: context.documents_used.unwrap_or_default(),
            search_collections: context.search_collections.unwrap_or_default(),
        }
    }
}

/// Parses a response body into a [`ChatReply`].
pub(crate) fn normalize(body: &str) -> Result<ChatReply> {
    let raw: RawChatResponse = serde_json::from_str(body).map_err(|e| {
        RagChatError::InvalidResponse(format!("unrecognized chat response: {e}"))
    })?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_response() {
        let reply = normalize(
            r#"{
                "message": {"content": "Office hours are 9am-5pm."},
                "context": {
                    "documentsUsed": [{"filename": "handbook.pdf", "collection": "hr", "similarity": 0.91}],
                    "searchCollections": ["hr"]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(reply.content, "Office hours are 9am-5pm.");
        assert_eq!(reply.sources.len(), 1);
        assert_eq!(reply.sources[0].filename, "handbook.pdf");
        assert_eq!(reply.sources[0].collection.as_deref(), Some("hr"));
        assert_eq!(reply.search_collections, vec!["hr".to_string()]);
    }

    #[test]
    fn test_structured_without_context() {
        let reply = normalize(r#"{"message": {"content": "hi"}}"#).unwrap();
        assert_eq!(reply, ChatReply::text("hi"));
    }

    #[test]
    fn test_null_context_fields() {
        let reply =
            normalize(r#"{"message": {"content": "hi"}, "context": {"documentsUsed": null}}"#)
                .unwrap();
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_flat_message() {
        let reply = normalize(r#"{"message": "plain answer"}"#).unwrap();
        assert_eq!(reply.content, "plain answer");
    }

    #[test]
    fn test_legacy_response_field() {
        let reply = normalize(r#"{"response": "legacy answer"}"#).unwrap();
        assert_eq!(reply.content, "legacy answer");
    }

    #[test]
    fn test_empty_content_uses_fallback() {
        let reply = normalize(r#"{"message": ""}"#).unwrap();
        assert_eq!(reply.content, EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        for body in [r#"{"answer": "x"}"#, r#"{"message": 42}"#, "[]", "not json"] {
            let err = normalize(body).unwrap_err();
            assert!(
                matches!(err, RagChatError::InvalidResponse(_)),
                "body {body} gave {err:?}"
            );
        }
    }
}
