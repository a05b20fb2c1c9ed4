//! File-backed key-value storage.
//!
//! Each key lives in its own `<dir>/<key>.json` file. Writes go through a
//! temporary file that is fsynced and atomically renamed over the target while
//! an exclusive lock file is held.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use ragchat_core::error::{RagChatError, Result};
use ragchat_core::storage::StorageBackend;

/// Persistent [`StorageBackend`] rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        let _lock = FileLock::acquire(&path)?;

        // Write to temporary file in the same directory
        let tmp_path = temp_path_for(&path)?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;
        tracing::trace!("[FileBackend] Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        let _lock = FileLock::acquire(&path)?;
        fs::remove_file(&path)?;
        Ok(())
    }
}

/// Maps a key to a safe file stem: anything outside `[A-Za-z0-9._-]` becomes `_`.
fn sanitize_key(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // Leading dots would hide the file and collide with temp files.
    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem.to_string()
    }
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| RagChatError::io("Path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| RagChatError::io("Path has no file name"))?;
    Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| RagChatError::storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().join("storage"));

        backend.write("rag-chat-settings", r#"{"theme":"dark"}"#).unwrap();

        let loaded = backend.read("rag-chat-settings").unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"theme":"dark"}"#));
        assert!(backend.path_for("rag-chat-settings").exists());
    }

    #[test]
    fn test_read_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path());
        assert_eq!(backend.read("nothing").unwrap(), None);
    }

    #[test]
    fn test_empty_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path());
        fs::write(backend.path_for("blank"), "  \n").unwrap();
        assert_eq!(backend.read("blank").unwrap(), None);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_or_lock_files() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path());
        backend.write("k", "1").unwrap();
        backend.write("k", "2").unwrap();

        assert_eq!(backend.read("k").unwrap().as_deref(), Some("2"));
        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path());
        backend.write("k", "1").unwrap();
        backend.delete("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
        // Deleting an absent key is fine
        backend.delete("k").unwrap();
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("rag-chat-current"), "rag-chat-current");
        assert_eq!(sanitize_key("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_key("a b:c"), "a_b_c");
        assert_eq!(sanitize_key(".."), "_");
    }
}
