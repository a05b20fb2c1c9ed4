//! Application layer for RagChat.
//!
//! Coordinates the core stores and session into the two client surfaces:
//! the full chat client ([`ChatApp`]) and the embeddable widget
//! ([`widget::EmbedWidget`]). Timers owned here (toast dismissal, health
//! checks) are released when their owner is dropped.

pub mod app;
pub mod connection_monitor;
pub mod format;
pub mod toast_center;
pub mod widget;

pub use app::{ChatApp, ChatAppBuilder, QUICK_ACTIONS, SilentSoundCue, SoundCue};
pub use connection_monitor::ConnectionMonitor;
pub use format::{escape_html, format_message};
pub use toast_center::ToastCenter;
