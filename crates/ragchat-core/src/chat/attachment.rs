//! Attachment validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RagChatError;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Reasons an attachment is refused at selection time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("File {name} is too large. Maximum size is {max_mb}MB.")]
    TooLarge { name: String, size: u64, max_mb: u64 },

    #[error("File type {extension} is not allowed.")]
    DisallowedType { name: String, extension: String },

    #[error("File {name} could not be read: {reason}")]
    Unreadable { name: String, reason: String },
}

impl From<AttachmentError> for RagChatError {
    fn from(err: AttachmentError) -> Self {
        RagChatError::Validation(err.to_string())
    }
}

/// Size and type limits applied to every selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPolicy {
    /// Maximum size in bytes.
    pub max_file_size: u64,
    /// Allowed extensions including the leading dot, e.g. `.pdf`.
    pub allowed_file_types: Vec<String>,
}

impl AttachmentPolicy {
    /// Checks a candidate file by name and size.
    pub fn validate(&self, name: &str, size: u64) -> Result<(), AttachmentError> {
        if size > self.max_file_size {
            return Err(AttachmentError::TooLarge {
                name: name.to_string(),
                size,
                max_mb: (self.max_file_size + BYTES_PER_MB / 2) / BYTES_PER_MB,
            });
        }

        let extension = extension_of(name);
        let allowed = self
            .allowed_file_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension));
        if !allowed {
            return Err(AttachmentError::DisallowedType {
                name: name.to_string(),
                extension,
            });
        }

        Ok(())
    }

    /// Comma-separated list suitable for a file picker filter.
    pub fn accept_filter(&self) -> String {
        self.allowed_file_types.join(",")
    }
}

/// Lower-cased extension with leading dot, taken after the last `.`.
///
/// A name without a dot yields the whole name, mirroring how a browser picker
/// reports it, which then never matches the allow-list.
pub fn extension_of(name: &str) -> String {
    let tail = name.rsplit('.').next().unwrap_or(name);
    format!(".{}", tail.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AttachmentPolicy {
        AttachmentPolicy {
            max_file_size: 10 * BYTES_PER_MB,
            allowed_file_types: vec![".pdf".into(), ".png".into(), ".txt".into()],
        }
    }

    #[test]
    fn test_accepts_allowed_file() {
        assert!(policy().validate("handbook.pdf", 1024).is_ok());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(policy().validate("SCAN.PNG", 1024).is_ok());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = policy().validate("big.pdf", 10 * BYTES_PER_MB + 1).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { max_mb: 10, .. }));
        assert_eq!(
            err.to_string(),
            "File big.pdf is too large. Maximum size is 10MB."
        );
    }

    #[test]
    fn test_size_at_limit_is_allowed() {
        assert!(policy().validate("edge.txt", 10 * BYTES_PER_MB).is_ok());
    }

    #[test]
    fn test_rejects_disallowed_extension() {
        let err = policy().validate("setup.exe", 10).unwrap_err();
        assert_eq!(err.to_string(), "File type .exe is not allowed.");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.tar.GZ"), ".gz");
        assert_eq!(extension_of("README"), ".readme");
    }

    #[test]
    fn test_converts_into_validation_error() {
        let err: RagChatError = policy().validate("x.exe", 1).unwrap_err().into();
        assert!(err.is_validation());
    }
}
