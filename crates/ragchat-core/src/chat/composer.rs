//! Draft input state: message text plus the pending attachment set.

use super::attachment::{AttachmentError, AttachmentPolicy};
use super::message::Attachment;
use crate::text::MAX_MESSAGE_LENGTH;

/// The message being composed before it is sent.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    text: String,
    attachments: Vec<Attachment>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_over_limit(&self) -> bool {
        self.char_count() > MAX_MESSAGE_LENGTH
    }

    /// `"n / 2000"` counter shown under the input.
    pub fn char_count_label(&self) -> String {
        format!("{} / {}", self.char_count(), MAX_MESSAGE_LENGTH)
    }

    /// Adds `candidate` to the pending set if it passes `policy`.
    ///
    /// A rejected candidate leaves the pending set untouched.
    pub fn add_attachment(
        &mut self,
        candidate: Attachment,
        policy: &AttachmentPolicy,
    ) -> Result<(), AttachmentError> {
        policy.validate(&candidate.name, candidate.size)?;
        self.attachments.push(candidate);
        Ok(())
    }

    /// Removes a pending attachment. Returns false if `id` was not pending.
    pub fn remove_attachment(&mut self, id: &str) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a.id != id);
        self.attachments.len() != before
    }

    /// Whether the send affordance should be enabled.
    pub fn can_submit(&self, disabled: bool) -> bool {
        !disabled
            && !self.is_over_limit()
            && (!self.text.trim().is_empty() || !self.attachments.is_empty())
    }

    /// Drains the draft into `(trimmed text, attachments)` if it can be sent.
    pub fn submit(&mut self, disabled: bool) -> Option<(String, Vec<Attachment>)> {
        if !self.can_submit(disabled) {
            return None;
        }
        let text = self.text.trim().to_string();
        self.text.clear();
        Some((text, std::mem::take(&mut self.attachments)))
    }
}
