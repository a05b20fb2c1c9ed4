//! Core of the RagChat client.
//!
//! Domain types and the state stores that back every front end:
//!
//! - [`storage`]: JSON key-value store with fallback semantics
//! - [`settings`]: typed user preferences and the theme side effect
//! - [`history`]: persisted conversations, capped at 50
//! - [`chat`]: messages, attachments, the composer and the active session
//! - [`toast`]: notification queue
//! - [`connection`]: backend reachability
//! - [`config`]: client configuration model

pub mod chat;
pub mod config;
pub mod connection;
pub mod error;
pub mod history;
pub mod settings;
pub mod storage;
pub mod text;
pub mod toast;

pub use error::{RagChatError, Result};
