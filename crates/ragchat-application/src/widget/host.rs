//! Widget mounting and the public instance API.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ragchat_core::chat::{ChatBackend, ChatSession, Composer, SendOutcome};
use ragchat_core::connection::{ConnectionStatus, HealthProbe};
use ragchat_core::error::{RagChatError, Result};
use ragchat_core::settings::{ColorSchemeSource, FixedColorScheme, ResolvedTheme, Theme};

use super::config::WidgetConfig;
use super::view::{CHAR_COUNT_WARNING, ComposerView, HeaderView, MessageView, WelcomeView, WidgetView};
use crate::connection_monitor::ConnectionMonitor;

/// Prior messages forwarded with each widget request.
pub const WIDGET_HISTORY_WINDOW: usize = 8;

/// Interval between widget health checks.
pub const WIDGET_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

pub const WELCOME_GREETING: &str =
    "Hello! I'm your AI assistant. I'm here to help answer your questions and provide support.";

pub const WIDGET_QUICK_ACTIONS: [&str; 3] =
    ["How can you help me?", "What can you do?", "I need support"];

/// Guards the single widget slot of a host surface.
///
/// Cloning the host shares the slot, so every clone sees the same mounted widget.
/// The host also supplies the platform dark-mode signal used to resolve an
/// `auto` widget theme.
#[derive(Clone)]
pub struct WidgetHost {
    mounted: Arc<AtomicBool>,
    color_scheme: Arc<dyn ColorSchemeSource>,
}

impl Default for WidgetHost {
    fn default() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(false)),
            color_scheme: Arc::new(FixedColorScheme::default()),
        }
    }
}

impl WidgetHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color_scheme(mut self, color_scheme: Arc<dyn ColorSchemeSource>) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    /// Creates the widget. Fails with `AlreadyInitialized` while another
    /// widget from this host is alive.
    ///
    /// Must be called within a Tokio runtime when `probe` is given.
    pub fn mount(
        &self,
        config: WidgetConfig,
        backend: Arc<dyn ChatBackend>,
        probe: Option<Arc<dyn HealthProbe>>,
    ) -> Result<EmbedWidget> {
        if self
            .mounted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("[Widget] Mount rejected: a widget is already mounted");
            return Err(RagChatError::AlreadyInitialized("chat widget".to_string()));
        }

        let slot = MountSlot(Arc::clone(&self.mounted));
        let session = ChatSession::new(backend, config.context.clone())
            .with_history_window(WIDGET_HISTORY_WINDOW);
        let monitor = probe.map(|probe| ConnectionMonitor::start(probe, WIDGET_HEALTH_INTERVAL));
        let is_open = config.is_embedded();

        tracing::info!(
            "[Widget] Mounted '{}' ({})",
            config.title,
            if is_open { "embedded" } else { "floating" }
        );

        Ok(EmbedWidget {
            config,
            is_open,
            session,
            composer: Composer::new(),
            monitor,
            color_scheme: Arc::clone(&self.color_scheme),
            _slot: slot,
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

/// Releases the host slot when the widget goes away.
struct MountSlot(Arc<AtomicBool>);

impl Drop for MountSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A mounted chat widget.
pub struct EmbedWidget {
    config: WidgetConfig,
    is_open: bool,
    session: ChatSession,
    composer: Composer,
    monitor: Option<ConnectionMonitor>,
    color_scheme: Arc<dyn ColorSchemeSource>,
    _slot: MountSlot,
}

impl EmbedWidget {
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closes the panel. Embedded widgets stay open.
    pub fn close(&mut self) {
        if self.config.is_embedded() {
            return;
        }
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Tears the widget down, stopping its health checks and freeing the host slot.
    pub fn destroy(self) {
        tracing::info!("[Widget] Destroyed '{}'", self.config.title);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = title.into();
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.config.avatar = avatar;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
    }

    /// The configured theme resolved against the host's colour scheme.
    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.config.theme.resolve(self.color_scheme.prefers_dark())
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Sends `text` directly, bypassing the composer.
    ///
    /// Blank text and sends while a reply is pending are ignored.
    pub async fn send(&self, text: &str) -> Option<SendOutcome> {
        let text = text.trim();
        if text.is_empty() || self.session.is_loading().await {
            return None;
        }
        Some(self.session.send(text, Vec::new()).await)
    }

    /// Sends whatever the composer holds.
    pub async fn submit(&mut self) -> Option<SendOutcome> {
        let disabled = self.session.is_loading().await;
        let (text, _) = self.composer.submit(disabled)?;
        Some(self.session.send(text, Vec::new()).await)
    }

    /// Sends one of [`WIDGET_QUICK_ACTIONS`] by index.
    pub async fn send_quick_action(&self, index: usize) -> Option<SendOutcome> {
        let query = WIDGET_QUICK_ACTIONS.get(index)?;
        self.send(query).await
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.monitor
            .as_ref()
            .map(ConnectionMonitor::status)
            .unwrap_or_default()
    }

    /// Builds the current view model.
    pub async fn view(&self) -> WidgetView {
        let snapshot = self.session.snapshot().await;
        let status = self.connection_status();

        WidgetView {
            is_open: self.is_open,
            theme: self.resolved_theme(),
            embedded: self.config.is_embedded(),
            width: self.config.width.clone(),
            height: self.config.height.clone(),
            header: HeaderView {
                title: self.config.title.clone(),
                subtitle: self.config.subtitle.clone(),
                avatar: self.config.avatar.clone(),
                status,
                status_label: status.label(),
                closable: !self.config.is_embedded(),
            },
            welcome: WelcomeView {
                greeting: WELCOME_GREETING.to_string(),
                quick_actions: WIDGET_QUICK_ACTIONS.iter().map(|q| q.to_string()).collect(),
            },
            messages: snapshot.messages.iter().map(MessageView::from).collect(),
            typing: snapshot.is_loading,
            composer: ComposerView {
                placeholder: self.config.placeholder.clone(),
                text: self.composer.text().to_string(),
                char_count_label: self.composer.char_count_label(),
                near_limit: self.composer.char_count() > CHAR_COUNT_WARNING,
                disabled: snapshot.is_loading,
                can_submit: self.composer.can_submit(snapshot.is_loading),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragchat_core::chat::{ChatReply, ChatRequest};
    use std::sync::Mutex;

    struct EchoBackend {
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl EchoBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.requests.lock().unwrap().push(request);
            Ok(ChatReply::text(format!("echo: {last}")))
        }
    }

    #[tokio::test]
    async fn test_second_mount_is_rejected_until_destroyed() {
        let host = WidgetHost::new();
        let widget = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .unwrap();
        assert!(host.is_mounted());

        let err = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .err()
            .unwrap();
        assert!(matches!(err, RagChatError::AlreadyInitialized(_)));

        widget.destroy();
        assert!(!host.is_mounted());
        assert!(host.mount(WidgetConfig::default(), EchoBackend::new(), None).is_ok());
    }

    #[tokio::test]
    async fn test_separate_hosts_are_independent() {
        let a = WidgetHost::new();
        let b = WidgetHost::new();
        let _first = a.mount(WidgetConfig::default(), EchoBackend::new(), None).unwrap();
        assert!(b.mount(WidgetConfig::default(), EchoBackend::new(), None).is_ok());
    }

    #[tokio::test]
    async fn test_floating_open_close_toggle() {
        let host = WidgetHost::new();
        let mut widget = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .unwrap();
        assert!(!widget.is_open());

        widget.toggle();
        assert!(widget.is_open());
        widget.close();
        assert!(!widget.is_open());
        widget.open();
        widget.toggle();
        assert!(!widget.is_open());
    }

    #[tokio::test]
    async fn test_embedded_is_always_open() {
        let host = WidgetHost::new();
        let mut widget = host
            .mount(WidgetConfig::embedded("help-panel"), EchoBackend::new(), None)
            .unwrap();
        assert!(widget.is_open());
        widget.close();
        widget.toggle();
        assert!(widget.is_open());

        let view = widget.view().await;
        assert!(view.embedded);
        assert!(!view.header.closable);
    }

    #[tokio::test]
    async fn test_runtime_title_and_avatar() {
        let host = WidgetHost::new();
        let mut widget = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .unwrap();
        widget.set_title("HR Helper");
        widget.set_avatar(Some("https://cdn.example.com/bot.png".to_string()));

        let view = widget.view().await;
        assert_eq!(view.header.title, "HR Helper");
        assert_eq!(
            view.header.avatar.as_deref(),
            Some("https://cdn.example.com/bot.png")
        );
        assert_eq!(view.header.status_label, "Connecting");
    }

    #[tokio::test]
    async fn test_send_and_view() {
        let host = WidgetHost::new();
        let mut widget = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .unwrap();

        assert!(widget.send("   ").await.is_none());
        assert_eq!(widget.send("hello").await, Some(SendOutcome::Replied));

        widget.composer_mut().set_text("a".repeat(1801));
        let view = widget.view().await;
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].kind.as_str(), "user");
        assert_eq!(view.messages[1].body_html, "echo: hello");
        assert!(!view.typing);
        assert!(view.composer.near_limit);
        assert_eq!(view.composer.char_count_label, "1801 / 2000");
        assert_eq!(view.welcome.quick_actions.len(), 3);
    }

    #[tokio::test]
    async fn test_theme_resolves_into_view() {
        let dark = WidgetConfig {
            theme: Theme::Dark,
            ..WidgetConfig::default()
        };
        let host = WidgetHost::new();
        let mut widget = host.mount(dark, EchoBackend::new(), None).unwrap();
        assert_eq!(widget.view().await.theme, ResolvedTheme::Dark);

        widget.set_theme(Theme::Light);
        assert_eq!(widget.view().await.theme, ResolvedTheme::Light);
    }

    #[tokio::test]
    async fn test_auto_theme_follows_host_color_scheme() {
        let host = WidgetHost::new()
            .with_color_scheme(Arc::new(FixedColorScheme { prefers_dark: true }));
        let widget = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .unwrap();
        assert_eq!(widget.resolved_theme(), ResolvedTheme::Dark);
    }

    #[tokio::test]
    async fn test_requests_carry_configured_context() {
        let backend = EchoBackend::new();
        let mut config = WidgetConfig::default();
        config.context.platform = "terminal".to_string();
        config.context.max_results = 2;
        let host = WidgetHost::new();
        let widget = host.mount(config, backend.clone(), None).unwrap();

        widget.send("hello").await;

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].context.platform, "terminal");
        assert_eq!(requests[0].context.max_results, 2);
    }

    #[tokio::test]
    async fn test_history_window_limits_request() {
        let backend = EchoBackend::new();
        let host = WidgetHost::new();
        let widget = host
            .mount(WidgetConfig::default(), backend.clone(), None)
            .unwrap();

        for i in 0..6 {
            widget.send(&format!("question {i}")).await;
        }
        let requests = backend.requests.lock().unwrap();
        let last = requests.last().unwrap();
        // 8 prior messages plus the new one
        assert_eq!(last.messages.len(), WIDGET_HISTORY_WINDOW + 1);
        assert_eq!(last.messages.last().unwrap().content, "question 5");
    }

    #[tokio::test]
    async fn test_submit_drains_composer_and_quick_actions() {
        let host = WidgetHost::new();
        let mut widget = host
            .mount(WidgetConfig::default(), EchoBackend::new(), None)
            .unwrap();

        widget.composer_mut().set_text("  from the box  ");
        assert_eq!(widget.submit().await, Some(SendOutcome::Replied));
        assert_eq!(widget.composer().text(), "");
        assert!(widget.submit().await.is_none());

        assert_eq!(widget.send_quick_action(2).await, Some(SendOutcome::Replied));
        assert!(widget.send_quick_action(7).await.is_none());

        let messages = widget.session().messages().await;
        assert_eq!(messages[0].content, "from the box");
        assert_eq!(messages[2].content, "I need support");
    }
}
