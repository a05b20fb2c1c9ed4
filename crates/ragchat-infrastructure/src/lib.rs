//! Infrastructure layer for the RagChat client.
//!
//! Filesystem-backed implementations of the seams defined in `ragchat-core`:
//! key-value storage, configuration loading, attachment reading, export
//! delivery, and colour-scheme detection.

pub mod attachment_loader;
pub mod color_scheme;
pub mod config_service;
pub mod export_sink;
pub mod paths;
pub mod storage;

pub use attachment_loader::load_attachment;
pub use color_scheme::EnvColorScheme;
pub use config_service::ConfigService;
pub use export_sink::DirectoryExportSink;
pub use paths::{PathError, RagChatPaths};
pub use storage::FileBackend;
