//! Chat session state: the active, in-memory list of messages.
//!
//! State machine per `send`: `Idle -> Sending -> (Idle | Errored)`. Each send
//! holds a child token of the session epoch; `clear` and `replace` cancel the
//! epoch so a reply that lands after a conversation switch is discarded.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::backend::{ApiMessage, ChatBackend, ChatRequest, RequestContext};
use super::message::{Attachment, Message};
use crate::error::RagChatError;

/// Coarse status of the session, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Sending,
    Errored,
}

/// What happened to one `send` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// An assistant reply was appended.
    Replied,
    /// An error-flagged assistant message was appended.
    Failed(RagChatError),
    /// The session was cleared or replaced before the reply arrived.
    Discarded,
}

impl SendOutcome {
    pub fn is_discarded(&self) -> bool {
        matches!(self, SendOutcome::Discarded)
    }
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub status: SessionStatus,
}

struct SessionState {
    messages: Vec<Message>,
    in_flight: usize,
    last_error: Option<String>,
    epoch: CancellationToken,
}

impl SessionState {
    fn status(&self) -> SessionStatus {
        if self.in_flight > 0 {
            SessionStatus::Sending
        } else if self.last_error.is_some() {
            SessionStatus::Errored
        } else {
            SessionStatus::Idle
        }
    }

    /// Cancels every pending send and starts a new epoch.
    fn reset_epoch(&mut self) {
        self.epoch.cancel();
        self.epoch = CancellationToken::new();
        self.in_flight = 0;
    }
}

/// The active chat session.
pub struct ChatSession {
    state: RwLock<SessionState>,
    backend: Arc<dyn ChatBackend>,
    context: RequestContext,
    /// Number of prior messages forwarded with each request; `None` forwards all.
    history_window: Option<usize>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>, context: RequestContext) -> Self {
        Self {
            state: RwLock::new(SessionState {
                messages: Vec::new(),
                in_flight: 0,
                last_error: None,
                epoch: CancellationToken::new(),
            }),
            backend,
            context,
            history_window: None,
        }
    }

    /// Limits how many earlier messages are sent along with a new one.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = Some(window);
        self
    }

    /// Appends a user message, calls the backend and appends its reply.
    ///
    /// Never returns an error: failures become an error-flagged assistant
    /// message and are reported through [`SendOutcome::Failed`].
    pub async fn send(&self, content: impl Into<String>, attachments: Vec<Attachment>) -> SendOutcome {
        let (request, token) = {
            let mut state = self.state.write().await;
            let user_message = Message::user(content, attachments.clone());
            state.messages.push(user_message);
            state.in_flight += 1;
            state.last_error = None;

            let request = ChatRequest {
                messages: self.outbound_messages(&state.messages),
                context: self.context.clone(),
                attachments: (!attachments.is_empty()).then_some(attachments),
            };
            (request, state.epoch.child_token())
        };

        tracing::debug!(
            "[Session] Sending {} messages to backend",
            request.messages.len()
        );

        let result = tokio::select! {
            _ = token.cancelled() => None,
            result = self.backend.send_chat(request) => Some(result),
        };

        let mut state = self.state.write().await;
        let result = match result {
            Some(result) if !token.is_cancelled() => result,
            _ => {
                tracing::info!("[Session] Discarding reply for a superseded send");
                return SendOutcome::Discarded;
            }
        };

        let outcome = match result {
            Ok(reply) => {
                state
                    .messages
                    .push(Message::assistant(reply.content, reply.sources));
                SendOutcome::Replied
            }
            Err(err) => {
                tracing::warn!("[Session] Chat request failed: {}", err);
                state.messages.push(Message::error(format!(
                    "I apologize, but I encountered an error: {err}. Please try again."
                )));
                state.last_error = Some(err.to_string());
                SendOutcome::Failed(err)
            }
        };
        state.in_flight = state.in_flight.saturating_sub(1);
        outcome
    }

    fn outbound_messages(&self, messages: &[Message]) -> Vec<ApiMessage> {
        let prior = messages.len().saturating_sub(1);
        let start = match self.history_window {
            Some(window) => prior - prior.min(window),
            None => 0,
        };
        messages[start..].iter().map(ApiMessage::from).collect()
    }

    /// Empties the message list and the last error, cancelling pending sends.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.reset_epoch();
        state.messages.clear();
        state.last_error = None;
    }

    /// Swaps in `messages` wholesale, cancelling pending sends.
    pub async fn replace(&self, messages: Vec<Message>) {
        let mut state = self.state.write().await;
        state.reset_epoch();
        state.messages = messages;
        state.last_error = None;
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.in_flight > 0
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            messages: state.messages.clone(),
            is_loading: state.in_flight > 0,
            last_error: state.last_error.clone(),
            status: state.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::backend::ChatReply;
    use crate::chat::message::{MessageRole, Source};
    use crate::error::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Backend that records requests and replies from a fixed script.
    struct ScriptedBackend {
        reply: Result<ChatReply>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        fn new(reply: Result<ChatReply>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    /// Backend that blocks until released.
    struct GatedBackend {
        gate: Notify,
    }

    #[async_trait]
    impl ChatBackend for GatedBackend {
        async fn send_chat(&self, _request: ChatRequest) -> Result<ChatReply> {
            self.gate.notified().await;
            Ok(ChatReply::text("late reply"))
        }
    }

    #[tokio::test]
    async fn test_successful_send_appends_reply_with_sources() {
        let reply = ChatReply {
            content: "9am-5pm".to_string(),
            sources: vec![Source::new("handbook.pdf", 0.92)],
            search_collections: vec![],
        };
        let backend = ScriptedBackend::new(Ok(reply));
        let session = ChatSession::new(backend.clone(), RequestContext::default());

        let outcome = session.send("What are the office hours?", Vec::new()).await;

        assert_eq!(outcome, SendOutcome::Replied);
        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "9am-5pm");
        assert_eq!(messages[1].source_count(), 1);
        assert!(!session.is_loading().await);
        assert_eq!(session.status().await, SessionStatus::Idle);
    }

    #[tokio::test]
    async fn test_failed_send_appends_error_message() {
        let backend = ScriptedBackend::new(Err(RagChatError::network(None, "connection refused")));
        let session = ChatSession::new(backend, RequestContext::default());

        let outcome = session.send("hello", Vec::new()).await;

        assert!(matches!(outcome, SendOutcome::Failed(_)));
        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(messages[1].is_error);
        assert!(messages[1].content.starts_with("I apologize, but I encountered an error:"));
        assert!(!session.is_loading().await);
        assert_eq!(session.status().await, SessionStatus::Errored);
        assert_eq!(
            session.last_error().await.as_deref(),
            Some("Network error: connection refused")
        );
    }

    #[tokio::test]
    async fn test_request_carries_full_history_and_attachments() {
        let backend = ScriptedBackend::new(Ok(ChatReply::text("ok")));
        let session = ChatSession::new(backend.clone(), RequestContext::default());

        session.send("first", Vec::new()).await;
        let attachment = Attachment::new("notes.txt", "text/plain", 3);
        session.send("second", vec![attachment.clone()]).await;

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].attachments.is_none());
        let contents: Vec<_> = requests[1].messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "ok", "second"]);
        assert_eq!(requests[1].attachments.as_deref(), Some(&[attachment][..]));
    }

    #[tokio::test]
    async fn test_history_window_limits_prior_messages() {
        let backend = ScriptedBackend::new(Ok(ChatReply::text("ok")));
        let session =
            ChatSession::new(backend.clone(), RequestContext::default()).with_history_window(2);

        session.send("one", Vec::new()).await;
        session.send("two", Vec::new()).await;
        session.send("three", Vec::new()).await;

        let last = backend.requests().pop().unwrap();
        let contents: Vec<_> = last.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "ok", "three"]);
    }

    #[tokio::test]
    async fn test_clear_discards_late_reply() {
        let backend = Arc::new(GatedBackend { gate: Notify::new() });
        let session = Arc::new(ChatSession::new(backend.clone(), RequestContext::default()));

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.send("hello", Vec::new()).await })
        };

        // Wait until the user message is visible, i.e. the send is in flight.
        while !session.is_loading().await {
            tokio::task::yield_now().await;
        }

        session.clear().await;
        backend.gate.notify_one();

        let outcome = pending.await.unwrap();
        assert_eq!(outcome, SendOutcome::Discarded);
        assert!(session.messages().await.is_empty());
        assert!(!session.is_loading().await);
    }

    #[tokio::test]
    async fn test_replace_swaps_messages() {
        let backend = ScriptedBackend::new(Ok(ChatReply::text("ok")));
        let session = ChatSession::new(backend, RequestContext::default());
        session.send("will be replaced", Vec::new()).await;

        let loaded = vec![Message::user("restored", Vec::new())];
        session.replace(loaded.clone()).await;

        assert_eq!(session.messages().await, loaded);
        assert!(session.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_resets_error() {
        let backend = ScriptedBackend::new(Err(RagChatError::network(Some(500), "oops")));
        let session = ChatSession::new(backend, RequestContext::default());
        session.send("hello", Vec::new()).await;

        session.clear().await;

        let snapshot = session.snapshot().await;
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.last_error.is_none());
        assert_eq!(snapshot.status, SessionStatus::Idle);
    }
}
