//! Delivery of exported history documents.

use std::path::PathBuf;

use crate::error::Result;

/// Receives an exported document, the native counterpart of a browser download.
pub trait ExportSink: Send + Sync {
    /// Stores `contents` under `file_name` and returns where it ended up.
    fn deliver(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}
