//! Conversation history store.
//!
//! Identity policy: the store is bound to at most one *current* conversation.
//! `save` rewrites that conversation while it exists; otherwise it creates a new
//! one and binds to it. `resume` binds to an existing conversation and
//! `new_conversation` unbinds. The binding is persisted alongside the list.

use std::path::PathBuf;

use super::export::ExportSink;
use super::model::{Conversation, ConversationSummary, HistoryExport};
use crate::chat::{Message, MessageRole};
use crate::error::Result;
use crate::storage::{LocalStore, keys};
use crate::text::{generate_id, now, truncate_text};

/// Maximum number of conversations kept; the oldest are evicted first.
pub const MAX_CONVERSATIONS: usize = 50;

/// Title used when a session has no user message.
pub const UNTITLED: &str = "New Conversation";

/// Preview used when a session has no assistant message.
pub const NO_PREVIEW: &str = "No preview available";

const TITLE_MAX_CHARS: usize = 50;
const PREVIEW_MAX_CHARS: usize = 100;

/// Keyed collection of past sessions, most recently updated first.
pub struct ConversationHistory {
    store: LocalStore,
    conversations: Vec<Conversation>,
    current_id: Option<String>,
}

impl ConversationHistory {
    /// Loads the persisted list and the current-conversation binding.
    pub fn load(store: LocalStore) -> Self {
        let raw: Vec<serde_json::Value> = store.get(keys::CONVERSATIONS, Vec::new());
        let mut conversations: Vec<Conversation> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(conversation) => Some(conversation),
                Err(e) => {
                    tracing::warn!("[History] Dropping unreadable conversation #{}: {}", index, e);
                    None
                }
            })
            .collect();
        // Stable sort keeps the stored order among equal timestamps.
        conversations.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        conversations.truncate(MAX_CONVERSATIONS);

        let current_id: Option<String> = store
            .get::<Option<String>>(keys::CURRENT_CONVERSATION, None)
            .filter(|id| conversations.iter().any(|c| &c.id == id));

        tracing::debug!(
            "[History] Loaded {} conversations (current: {:?})",
            conversations.len(),
            current_id
        );

        Self {
            store,
            conversations,
            current_id,
        }
    }

    /// Snapshots `messages` into the current conversation.
    ///
    /// Returns the conversation id, or `None` when `messages` is empty (no-op).
    pub fn save(&mut self, messages: &[Message]) -> Option<String> {
        if messages.is_empty() {
            return None;
        }

        let existing = self
            .current_id
            .as_ref()
            .and_then(|id| self.conversations.iter().position(|c| &c.id == id));
        let id = match existing {
            Some(index) => self.conversations.remove(index).id,
            None => generate_id(),
        };

        let conversation = Conversation {
            id: id.clone(),
            title: derive_title(messages),
            preview: derive_preview(messages),
            messages: messages.to_vec(),
            last_updated: now(),
        };
        self.conversations.insert(0, conversation);

        if self.conversations.len() > MAX_CONVERSATIONS {
            let evicted = self.conversations.len() - MAX_CONVERSATIONS;
            self.conversations.truncate(MAX_CONVERSATIONS);
            tracing::info!("[History] Evicted {} oldest conversations", evicted);
        }

        self.current_id = Some(id.clone());
        self.persist();
        Some(id)
    }

    /// Looks up a conversation by id.
    pub fn load_conversation(&self, id: &str) -> Option<Conversation> {
        self.conversations.iter().find(|c| c.id == id).cloned()
    }

    /// Looks up a conversation and binds subsequent saves to it.
    pub fn resume(&mut self, id: &str) -> Option<Conversation> {
        let conversation = self.load_conversation(id)?;
        self.current_id = Some(conversation.id.clone());
        self.store
            .set(keys::CURRENT_CONVERSATION, &self.current_id);
        Some(conversation)
    }

    /// Unbinds, so the next save starts a new conversation.
    pub fn new_conversation(&mut self) {
        self.current_id = None;
        self.store.remove(keys::CURRENT_CONVERSATION);
    }

    /// Drops every conversation, in memory and in storage.
    pub fn clear(&mut self) {
        self.conversations.clear();
        self.current_id = None;
        self.store.remove(keys::CONVERSATIONS);
        self.store.remove(keys::CURRENT_CONVERSATION);
    }

    /// Builds the export document for the current contents.
    pub fn export(&self) -> HistoryExport {
        HistoryExport {
            timestamp: now(),
            conversations: self.conversations.clone(),
        }
    }

    /// Serializes an export and hands it to `sink`.
    pub fn export_to(&self, sink: &dyn ExportSink) -> Result<PathBuf> {
        let export = self.export();
        let contents = serde_json::to_string_pretty(&export)?;
        let path = sink.deliver(&export.file_name(), &contents)?;
        tracing::info!(
            "[History] Exported {} conversations to {:?}",
            export.conversations.len(),
            path
        );
        Ok(path)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn list(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(Conversation::summary).collect()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn persist(&self) {
        self.store.set(keys::CONVERSATIONS, &self.conversations);
        self.store.set(keys::CURRENT_CONVERSATION, &self.current_id);
    }
}

fn first_with_role(messages: &[Message], role: MessageRole) -> Option<&Message> {
    messages.iter().find(|m| m.role == role)
}

fn derive_title(messages: &[Message]) -> String {
    first_with_role(messages, MessageRole::User)
        .map(|m| truncate_text(&m.content, TITLE_MAX_CHARS))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn derive_preview(messages: &[Message]) -> String {
    first_with_role(messages, MessageRole::Assistant)
        .map(|m| truncate_text(&m.content, PREVIEW_MAX_CHARS))
        .unwrap_or_else(|| NO_PREVIEW.to_string())
}
