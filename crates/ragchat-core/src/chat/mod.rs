//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: message, source and attachment types
//! - `attachment`: attachment validation policy
//! - `composer`: draft text and pending attachments
//! - `backend`: request/reply types and the `ChatBackend` trait
//! - `session`: the active session state machine (`ChatSession`)

mod attachment;
mod backend;
mod composer;
pub(crate) mod message;
mod session;

pub use attachment::{AttachmentError, AttachmentPolicy, extension_of};
pub use backend::{ApiMessage, ChatBackend, ChatReply, ChatRequest, RequestContext};
pub use composer::Composer;
pub use message::{Attachment, Message, MessageRole, Source};
pub use session::{ChatSession, SendOutcome, SessionSnapshot, SessionStatus};
