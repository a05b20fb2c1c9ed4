//! Embeddable chat widget.
//!
//! A lightweight surface over the same chat session core: a header with
//! connection status, the message list, and a composer. Mount it through a
//! [`WidgetHost`], then draw [`EmbedWidget::view`] with any [`Renderer`].

mod config;
mod host;
mod render;
mod view;

pub use config::{FloatingPosition, WidgetConfig, WidgetMode};
pub use host::{
    EmbedWidget, WELCOME_GREETING, WIDGET_HEALTH_INTERVAL, WIDGET_HISTORY_WINDOW,
    WIDGET_QUICK_ACTIONS, WidgetHost,
};
pub use render::{HtmlRenderer, Renderer};
pub use view::{
    CHAR_COUNT_WARNING, ComposerView, HeaderView, MessageKind, MessageView, WelcomeView,
    WidgetView,
};
