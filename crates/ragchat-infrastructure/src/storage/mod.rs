//! Storage layer for persisted client state.

mod file_backend;

pub use file_backend::FileBackend;
