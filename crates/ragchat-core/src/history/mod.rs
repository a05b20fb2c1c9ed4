//! Conversation history module.
//!
//! - `model`: `Conversation`, `ConversationSummary`, `HistoryExport`
//! - `export`: `ExportSink` trait for delivering exports
//! - `store`: `ConversationHistory`, capped at [`MAX_CONVERSATIONS`]

mod export;
mod model;
mod store;

pub use export::ExportSink;
pub use model::{Conversation, ConversationSummary, HistoryExport};
pub use store::{ConversationHistory, MAX_CONVERSATIONS, NO_PREVIEW, UNTITLED};
