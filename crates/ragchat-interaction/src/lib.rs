//! HTTP implementations of the RagChat backend seams.
//!
//! - [`HttpChatBackend`]: `POST {base}/chat/web`
//! - [`HttpHealthProbe`]: `GET {base}/health`

pub mod chat_backend;
pub mod health_probe;
mod response;

pub use chat_backend::HttpChatBackend;
pub use health_probe::HttpHealthProbe;
