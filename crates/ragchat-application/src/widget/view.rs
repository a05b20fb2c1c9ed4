//! Declarative view model of the embed widget.

use ragchat_core::chat::{Message, MessageRole};
use ragchat_core::connection::ConnectionStatus;
use ragchat_core::settings::ResolvedTheme;
use ragchat_core::text::format_time;

use crate::format::{escape_html, format_message};

/// Character count above which the counter is highlighted.
pub const CHAR_COUNT_WARNING: usize = 1800;

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub title: String,
    pub subtitle: String,
    pub avatar: Option<String>,
    pub status: ConnectionStatus,
    pub status_label: &'static str,
    /// Floating widgets show a close button; embedded ones do not.
    pub closable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WelcomeView {
    pub greeting: String,
    pub quick_actions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub id: String,
    pub kind: MessageKind,
    /// Raw message text.
    pub text: String,
    /// HTML-safe body; assistant replies get links and line breaks.
    pub body_html: String,
    /// Local `HH:MM`.
    pub time: String,
    pub source_count: usize,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        let kind = match (message.role, message.is_error) {
            (_, true) => MessageKind::Error,
            (MessageRole::User, false) => MessageKind::User,
            (MessageRole::Assistant, false) => MessageKind::Assistant,
        };
        let body_html = match kind {
            MessageKind::Assistant => format_message(&message.content),
            MessageKind::User | MessageKind::Error => escape_html(&message.content),
        };
        Self {
            id: message.id.clone(),
            kind,
            text: message.content.clone(),
            body_html,
            time: format_time(&message.timestamp),
            source_count: message.source_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerView {
    pub placeholder: String,
    pub text: String,
    pub char_count_label: String,
    pub near_limit: bool,
    /// Input is disabled while a reply is pending.
    pub disabled: bool,
    pub can_submit: bool,
}

/// Everything a renderer needs to draw the widget once.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub is_open: bool,
    /// The configured theme, with `auto` already resolved.
    pub theme: ResolvedTheme,
    pub embedded: bool,
    pub width: String,
    pub height: String,
    pub header: HeaderView,
    pub welcome: WelcomeView,
    pub messages: Vec<MessageView>,
    /// Shown while a reply is pending.
    pub typing: bool,
    pub composer: ComposerView,
}
