//! Filesystem delivery of history exports.

use std::fs;
use std::path::PathBuf;

use ragchat_core::error::Result;
use ragchat_core::history::ExportSink;

/// Writes exports as files into a fixed directory, typically the user's downloads folder.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectoryExportSink {
    fn deliver(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.dir.join(file_name);
        fs::write(&path, contents)?;
        tracing::info!("[Export] Wrote {} bytes to {:?}", contents.len(), path);
        Ok(path)
    }
}
