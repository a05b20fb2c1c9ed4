//! JSON key-value store with fallback semantics.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use super::backend::StorageBackend;

/// Wraps a [`StorageBackend`] with JSON (de)serialization.
///
/// Failures never propagate: an absent key, unparsable text or a backend error
/// all make [`get`](Self::get) return the caller's fallback, and make
/// [`set`](Self::set)/[`remove`](Self::remove) a logged no-op.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Reads and deserializes `key`, or returns `fallback`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!("[Storage] Failed to read '{}': {}", key, e);
                return fallback;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[Storage] Discarding unparsable value for '{}': {}", key, e);
                fallback
            }
        }
    }

    /// Serializes `value` and stores it under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("[Storage] Failed to serialize '{}': {}", key, e);
                return;
            }
        };

        if let Err(e) = self.backend.write(key, &raw) {
            tracing::warn!("[Storage] Failed to write '{}': {}", key, e);
        }
    }

    /// Removes `key` from the backend.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            tracing::warn!("[Storage] Failed to remove '{}': {}", key, e);
        }
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RagChatError, Result};
    use crate::storage::MemoryBackend;

    /// Backend that fails every operation, like a browser with storage disabled.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(RagChatError::storage("unavailable"))
        }
        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(RagChatError::storage("quota exceeded"))
        }
        fn delete(&self, _key: &str) -> Result<()> {
            Err(RagChatError::storage("unavailable"))
        }
    }

    #[test]
    fn test_get_returns_fallback_for_missing_key() {
        let store = LocalStore::new(Arc::new(MemoryBackend::new()));
        let value: Vec<String> = store.get("nothing", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_set_then_get() {
        let store = LocalStore::new(Arc::new(MemoryBackend::new()));
        store.set("numbers", &vec![1, 2, 3]);
        let value: Vec<i32> = store.get("numbers", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        let backend = MemoryBackend::new();
        backend.write("bad", "{not json").unwrap();
        let store = LocalStore::new(Arc::new(backend));
        let value: i32 = store.get("bad", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_backend_errors_are_swallowed() {
        let store = LocalStore::new(Arc::new(BrokenBackend));
        store.set("k", &"value");
        store.remove("k");
        let value: String = store.get("k", "fallback".to_string());
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_remove() {
        let backend = MemoryBackend::new();
        let store = LocalStore::new(Arc::new(backend.clone()));
        store.set("k", &true);
        store.remove("k");
        assert!(!backend.contains("k"));
    }
}
