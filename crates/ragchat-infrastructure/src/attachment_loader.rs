//! Reads files selected for upload into [`Attachment`] values.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ragchat_core::chat::{Attachment, AttachmentError, AttachmentPolicy};

/// Validates and loads `path` as an attachment carrying a base64 data URL.
///
/// The policy is checked against the on-disk size before any content is read,
/// so oversized files are rejected without touching their bytes.
pub fn load_attachment(path: &Path, policy: &AttachmentPolicy) -> Result<Attachment, AttachmentError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let unreadable = |reason: String| AttachmentError::Unreadable {
        name: name.clone(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }

    policy.validate(&name, metadata.len())?;

    let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));

    tracing::debug!(
        "[Attachment] Loaded {} ({} bytes, {})",
        name,
        bytes.len(),
        mime_type
    );

    Ok(Attachment::new(name.clone(), mime_type, bytes.len() as u64).with_data(data_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::settings::Settings;
    use tempfile::TempDir;

    fn policy() -> AttachmentPolicy {
        Settings::default().attachment_policy()
    }

    #[test]
    fn test_load_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "hi").unwrap();

        let attachment = load_attachment(&path, &policy()).unwrap();
        assert_eq!(attachment.name, "notes.txt");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.size, 2);
        assert_eq!(attachment.data.as_deref(), Some("data:text/plain;base64,aGk="));
        assert!(!attachment.is_image());
    }

    #[test]
    fn test_image_is_detected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Diagram.PNG");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let attachment = load_attachment(&path, &policy()).unwrap();
        assert_eq!(attachment.mime_type, "image/png");
        assert!(attachment.is_image());
    }

    #[test]
    fn test_disallowed_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.exe");
        fs::write(&path, "MZ").unwrap();

        let err = load_attachment(&path, &policy()).unwrap_err();
        assert_eq!(err.to_string(), "File type .exe is not allowed.");
    }

    #[test]
    fn test_oversized_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.pdf");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let small = AttachmentPolicy {
            max_file_size: 1024,
            allowed_file_types: vec![".pdf".to_string()],
        };
        let err = load_attachment(&path, &small).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { size: 2048, .. }));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_attachment(&temp_dir.path().join("gone.pdf"), &policy()).unwrap_err();
        assert!(matches!(err, AttachmentError::Unreadable { ref name, .. } if name == "gone.pdf"));
    }
}
