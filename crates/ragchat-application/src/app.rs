//! ChatApp - the composition root for the full chat client.
//!
//! Owns the settings store, the history store, the active chat session, the
//! toast center and (optionally) the connection monitor. Every user action of
//! the full client goes through one of its methods.

use std::path::PathBuf;
use std::sync::Arc;

use ragchat_core::chat::{
    Attachment, AttachmentPolicy, ChatBackend, ChatSession, Composer, SendOutcome, SessionSnapshot,
};
use ragchat_core::config::ClientConfig;
use ragchat_core::connection::{ConnectionStatus, HealthProbe};
use ragchat_core::error::{RagChatError, Result};
use ragchat_core::history::{ConversationHistory, ConversationSummary, ExportSink};
use ragchat_core::settings::{
    ColorSchemeSource, FixedColorScheme, NoopThemeApplier, ResolvedTheme, Settings, SettingsPatch,
    SettingsStore, ThemeApplier,
};
use ragchat_core::storage::LocalStore;
use tokio::sync::{Mutex, watch};

use crate::connection_monitor::ConnectionMonitor;
use crate::toast_center::ToastCenter;

/// Suggested first questions shown while a conversation is empty.
pub const QUICK_ACTIONS: [(&str, &str); 4] = [
    ("How to request time off", "How do I request time off?"),
    ("The office hours", "What are the office hours?"),
    ("IT Support", "How do I contact IT support?"),
    ("Employee Portal", "How do I access the employee portal?"),
];

/// Audible feedback played when a message is sent with sound enabled.
pub trait SoundCue: Send + Sync {
    fn message_sent(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSoundCue;

impl SoundCue for SilentSoundCue {
    fn message_sent(&self) {}
}

/// Builder for [`ChatApp`].
pub struct ChatAppBuilder {
    store: LocalStore,
    backend: Arc<dyn ChatBackend>,
    config: ClientConfig,
    health_probe: Option<Arc<dyn HealthProbe>>,
    theme_applier: Arc<dyn ThemeApplier>,
    color_scheme: Arc<dyn ColorSchemeSource>,
    export_sink: Option<Arc<dyn ExportSink>>,
    sound: Arc<dyn SoundCue>,
}

impl ChatAppBuilder {
    pub fn new(store: LocalStore, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            store,
            backend,
            config: ClientConfig::default(),
            health_probe: None,
            theme_applier: Arc::new(NoopThemeApplier),
            color_scheme: Arc::new(FixedColorScheme::default()),
            export_sink: None,
            sound: Arc::new(SilentSoundCue),
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn health_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.health_probe = Some(probe);
        self
    }

    pub fn theme(
        mut self,
        applier: Arc<dyn ThemeApplier>,
        color_scheme: Arc<dyn ColorSchemeSource>,
    ) -> Self {
        self.theme_applier = applier;
        self.color_scheme = color_scheme;
        self
    }

    pub fn export_sink(mut self, sink: Arc<dyn ExportSink>) -> Self {
        self.export_sink = Some(sink);
        self
    }

    pub fn sound_cue(mut self, sound: Arc<dyn SoundCue>) -> Self {
        self.sound = sound;
        self
    }

    /// Loads persisted state and assembles the app.
    ///
    /// Must be called within a Tokio runtime when a health probe is set, since
    /// the connection monitor starts immediately.
    pub fn build(self) -> ChatApp {
        let settings = SettingsStore::load(
            self.store.clone(),
            self.theme_applier,
            self.color_scheme,
        );
        let history = ConversationHistory::load(self.store);
        let session = ChatSession::new(self.backend, self.config.request_context());
        let monitor = self
            .health_probe
            .map(|probe| ConnectionMonitor::start(probe, self.config.health_interval()));

        tracing::info!(
            "[ChatApp] Ready: {} saved conversations, health monitor {}",
            history.len(),
            if monitor.is_some() { "on" } else { "off" }
        );

        ChatApp {
            toasts: ToastCenter::new(self.config.toast_duration()),
            settings: Mutex::new(settings),
            history: Mutex::new(history),
            session,
            monitor,
            export_sink: self.export_sink,
            sound: self.sound,
        }
    }
}

/// The full chat client.
pub struct ChatApp {
    settings: Mutex<SettingsStore>,
    history: Mutex<ConversationHistory>,
    session: ChatSession,
    toasts: ToastCenter,
    monitor: Option<ConnectionMonitor>,
    export_sink: Option<Arc<dyn ExportSink>>,
    sound: Arc<dyn SoundCue>,
}

impl ChatApp {
    pub fn builder(store: LocalStore, backend: Arc<dyn ChatBackend>) -> ChatAppBuilder {
        ChatAppBuilder::new(store, backend)
    }

    /// Restores the conversation the previous run was bound to, if any.
    ///
    /// Returns `true` when messages were restored.
    pub async fn resume_current(&self) -> bool {
        let restored = {
            let history = self.history.lock().await;
            history
                .current_id()
                .and_then(|id| history.load_conversation(id))
        };
        match restored {
            Some(conversation) => {
                tracing::info!(
                    "[ChatApp] Resuming conversation {} ({} messages)",
                    conversation.id,
                    conversation.messages.len()
                );
                self.session.replace(conversation.messages).await;
                true
            }
            None => false,
        }
    }

    /// Sends a message and saves the session to history when enabled.
    pub async fn send(
        &self,
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> SendOutcome {
        if self.settings.lock().await.settings().sound_enabled {
            self.sound.message_sent();
        }

        let outcome = self.session.send(content, attachments).await;
        if !outcome.is_discarded() {
            self.save_session().await;
        }
        outcome
    }

    /// Drains the composer and sends its contents.
    ///
    /// Returns `None` when the composer has nothing sendable or a reply is pending.
    pub async fn submit(&self, composer: &mut Composer) -> Option<SendOutcome> {
        let disabled = self.session.is_loading().await;
        let (text, attachments) = composer.submit(disabled)?;
        Some(self.send(text, attachments).await)
    }

    /// Replaces the session with a stored conversation and binds history to it.
    pub async fn load_conversation(&self, id: &str) -> Result<()> {
        let conversation = self.history.lock().await.resume(id);
        match conversation {
            Some(conversation) => {
                self.session.replace(conversation.messages).await;
                self.toasts.success("Conversation loaded", None);
                Ok(())
            }
            None => {
                self.toasts.error("Conversation not found", None);
                Err(RagChatError::not_found("Conversation", id))
            }
        }
    }

    /// Clears the session; the next save starts a new conversation.
    pub async fn new_conversation(&self) {
        self.session.clear().await;
        self.history.lock().await.new_conversation();
    }

    /// Deletes every stored conversation. The active session is kept.
    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
        self.toasts.success("History cleared", None);
    }

    /// Exports all conversations through the configured sink.
    pub async fn export_history(&self) -> Result<PathBuf> {
        let result = match &self.export_sink {
            Some(sink) => self.history.lock().await.export_to(sink.as_ref()),
            None => Err(RagChatError::config("No export destination configured")),
        };
        match &result {
            Ok(_) => {
                self.toasts.success("History exported successfully", None);
            }
            Err(e) => {
                tracing::error!("[ChatApp] History export failed: {}", e);
                self.toasts.error("Failed to export history", Some(e.to_string()));
            }
        }
        result
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> Settings {
        self.settings.lock().await.update(patch)
    }

    pub async fn reset_settings(&self) -> Settings {
        self.settings.lock().await.reset()
    }

    pub async fn settings(&self) -> Settings {
        self.settings.lock().await.settings().clone()
    }

    pub async fn resolved_theme(&self) -> ResolvedTheme {
        self.settings.lock().await.resolved_theme()
    }

    /// Forwards a platform dark-mode change to the settings store.
    pub async fn on_color_scheme_changed(&self) {
        self.settings.lock().await.on_color_scheme_changed();
    }

    pub async fn attachment_policy(&self) -> AttachmentPolicy {
        self.settings.lock().await.settings().attachment_policy()
    }

    /// Summaries of stored conversations, most recent first.
    pub async fn conversations(&self) -> Vec<ConversationSummary> {
        self.history.lock().await.list()
    }

    pub async fn current_conversation_id(&self) -> Option<String> {
        self.history.lock().await.current_id().map(str::to_string)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot().await
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    /// `Unknown` when no health probe was configured.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.monitor
            .as_ref()
            .map(ConnectionMonitor::status)
            .unwrap_or_default()
    }

    pub fn subscribe_connection(&self) -> Option<watch::Receiver<ConnectionStatus>> {
        self.monitor.as_ref().map(ConnectionMonitor::subscribe)
    }

    async fn save_session(&self) {
        if !self.settings.lock().await.settings().save_history {
            return;
        }
        let messages = self.session.messages().await;
        if let Some(id) = self.history.lock().await.save(&messages) {
            tracing::debug!("[ChatApp] Saved {} messages to conversation {}", messages.len(), id);
        }
    }
}
