//! Persistence primitives.
//!
//! - `backend`: raw string storage (`StorageBackend`) and an in-memory implementation
//! - `local_store`: JSON (de)serialization with fallback on every failure (`LocalStore`)
//!
//! Every higher-level store (settings, conversation history) is built on `LocalStore`.

mod backend;
mod local_store;

pub use backend::{MemoryBackend, StorageBackend};
pub use local_store::LocalStore;

/// Logical keys used by the client.
pub mod keys {
    /// Settings singleton.
    pub const SETTINGS: &str = "rag-chat-settings";
    /// Conversation list.
    pub const CONVERSATIONS: &str = "rag-chat-conversations";
    /// Id of the conversation the active session is bound to.
    pub const CURRENT_CONVERSATION: &str = "rag-chat-current";
}
