//! Raw key-value storage backends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{RagChatError, Result};

/// An abstract string store, the equivalent of browser local storage.
///
/// Implementations report failures (quota, permissions, corrupt media) as errors;
/// absorbing them is the job of [`LocalStore`](super::LocalStore).
pub trait StorageBackend: Send + Sync {
    /// Reads the raw value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: Value found
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: The backend could not be read
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// In-process backend backed by a `HashMap`.
///
/// Cloning shares the underlying map, so two stores built on clones of the
/// same backend observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| RagChatError::storage(format!("memory backend poisoned: {e}")))
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
