//! Small text and time helpers shared by the stores and the views.

use chrono::{DateTime, Local, Utc};

/// Maximum length of a single outgoing chat message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Generates a fresh opaque identifier.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current instant in UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Truncates `text` to `max_chars` characters, appending `...` when cut.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text is never split
/// in the middle of a character.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
    }
}

/// Formats a timestamp as local `HH:MM`.
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Formats a timestamp as a local date with time, e.g. `Mar 4, 2025 14:05`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text("hello", 50), "hello");
        assert_eq!(truncate_text("", 3), "");
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        assert_eq!(truncate_text("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_text("abcdef", 3), "abc...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(generate_id(), generate_id());
        assert!(!generate_id().is_empty());
    }
}
