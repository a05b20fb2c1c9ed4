//! Ephemeral user-facing notifications.
//!
//! The queue only stores toasts and removes them; timing out is owned by
//! whoever renders them (see the application crate's toast center).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::text::generate_id;

/// Default time a toast stays visible.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Duration,
}

/// Ordered queue of visible toasts.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    default_duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastQueue {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            default_duration,
        }
    }

    /// Builds a toast without queueing it; `duration` falls back to the queue default.
    pub fn create(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
    ) -> Toast {
        Toast {
            id: generate_id(),
            kind,
            title: title.into(),
            message,
            duration: duration.unwrap_or(self.default_duration),
        }
    }

    /// Queues a toast and returns it.
    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
    ) -> Toast {
        let toast = self.create(kind, title, message, duration);
        self.insert(toast.clone());
        toast
    }

    pub fn insert(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn success(&mut self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.push(ToastKind::Success, title, message, None)
    }

    pub fn error(&mut self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.push(ToastKind::Error, title, message, None)
    }

    pub fn warning(&mut self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.push(ToastKind::Warning, title, message, None)
    }

    pub fn info(&mut self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.push(ToastKind::Info, title, message, None)
    }

    /// Removes a toast. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: &str) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
