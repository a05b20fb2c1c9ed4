//! Embed widget configuration.

use ragchat_core::chat::RequestContext;
use ragchat_core::config::ClientConfig;
use ragchat_core::settings::Theme;
use serde::{Deserialize, Serialize};

/// Corner a floating widget is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatingPosition {
    #[default]
    BottomRight,
    BottomLeft,
}

/// How the widget is placed on its host surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetMode {
    /// A launcher button that opens a chat panel.
    Floating { position: FloatingPosition },
    /// Rendered inline inside a named container and always open.
    Embedded { container: String },
}

impl Default for WidgetMode {
    fn default() -> Self {
        WidgetMode::Floating {
            position: FloatingPosition::default(),
        }
    }
}

/// Options accepted when mounting the widget. Every field is optional in
/// serialized form.
///
/// The host builds the widget's backend and health probe from `api_url`, see
/// [`WidgetConfig::backend_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub api_url: String,
    /// Hints sent with every chat request.
    pub context: RequestContext,
    pub title: String,
    pub subtitle: String,
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub mode: WidgetMode,
    pub width: String,
    pub height: String,
    pub placeholder: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            context: RequestContext::default(),
            title: "AI Assistant".to_string(),
            subtitle: "Online".to_string(),
            theme: Theme::Auto,
            avatar: None,
            mode: WidgetMode::default(),
            width: "400px".to_string(),
            height: "600px".to_string(),
            placeholder: "Ask me anything...".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Embedded-mode configuration targeting `container`.
    pub fn embedded(container: impl Into<String>) -> Self {
        Self {
            mode: WidgetMode::Embedded {
                container: container.into(),
            },
            ..Self::default()
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.mode, WidgetMode::Embedded { .. })
    }

    /// Takes the backend URL and request hints from the client configuration.
    pub fn with_client_config(mut self, client: &ClientConfig) -> Self {
        self.api_url = client.api_base_url.clone();
        self.context = client.request_context();
        self
    }

    /// `base` retargeted at this widget's `api_url`.
    pub fn backend_config(&self, base: &ClientConfig) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_url.clone(),
            ..base.clone()
        }
    }
}
