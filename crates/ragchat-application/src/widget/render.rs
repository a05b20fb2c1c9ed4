//! Rendering seam for [`WidgetView`].

use std::fmt::Write;

use ragchat_core::settings::ResolvedTheme;

use super::view::WidgetView;
use crate::format::escape_html;

/// Draws a widget view onto some surface.
pub trait Renderer {
    type Output;

    fn render(&mut self, view: &WidgetView) -> Self::Output;
}

/// Renders the widget as a self-contained HTML fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&mut self, view: &WidgetView) -> String {
        let mut html = String::new();
        let mode = if view.embedded { "rag-embedded" } else { "rag-floating" };
        let state = if view.is_open { "rag-open" } else { "rag-closed" };
        let theme = match view.theme {
            ResolvedTheme::Light => "rag-theme-light",
            ResolvedTheme::Dark => "rag-theme-dark",
        };

        // Writing into a String cannot fail.
        let _ = write!(
            html,
            r#"<div class="rag-chat-widget {mode} {state} {theme}" style="width: {}; height: {};">"#,
            escape_html(&view.width),
            escape_html(&view.height)
        );

        let _ = write!(html, r#"<div class="rag-chat-header">"#);
        if let Some(avatar) = &view.header.avatar {
            let _ = write!(html, r#"<img class="rag-avatar" src="{}" alt="">"#, escape_html(avatar));
        }
        let _ = write!(
            html,
            r#"<h3>{}</h3><p>{}</p><span class="rag-chat-status rag-status-{}">{}</span>"#,
            escape_html(&view.header.title),
            escape_html(&view.header.subtitle),
            view.header.status_label.to_lowercase(),
            view.header.status_label
        );
        if view.header.closable {
            let _ = write!(html, r#"<button class="rag-close-btn" aria-label="Close chat">&times;</button>"#);
        }
        html.push_str("</div>");

        html.push_str(r#"<div class="rag-messages-area">"#);
        let _ = write!(
            html,
            r#"<div class="rag-message rag-message-assistant"><p>{}</p>"#,
            escape_html(&view.welcome.greeting)
        );
        for query in &view.welcome.quick_actions {
            let escaped = escape_html(query);
            let _ = write!(
                html,
                r#"<button class="rag-quick-action-btn" data-query="{escaped}">{escaped}</button>"#
            );
        }
        html.push_str("</div>");

        for message in &view.messages {
            let _ = write!(
                html,
                r#"<div class="rag-message rag-message-{}" data-id="{}"><div class="rag-message-content">{}</div><time>{}</time></div>"#,
                message.kind.as_str(),
                escape_html(&message.id),
                message.body_html,
                message.time
            );
        }
        if view.typing {
            html.push_str(r#"<div class="rag-typing-indicator"><span></span><span></span><span></span></div>"#);
        }
        html.push_str("</div>");

        let disabled = if view.composer.disabled { " disabled" } else { "" };
        let warn = if view.composer.near_limit { " rag-char-warning" } else { "" };
        let _ = write!(
            html,
            r#"<div class="rag-input-area"><textarea placeholder="{}" maxlength="2000"{disabled}>{}</textarea><span class="rag-char-count{warn}">{}</span></div>"#,
            escape_html(&view.composer.placeholder),
            escape_html(&view.composer.text),
            view.composer.char_count_label
        );

        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::view::{ComposerView, HeaderView, MessageKind, MessageView, WelcomeView};
    use ragchat_core::connection::ConnectionStatus;

    fn view() -> WidgetView {
        WidgetView {
            is_open: true,
            theme: ResolvedTheme::Dark,
            embedded: false,
            width: "400px".into(),
            height: "600px".into(),
            header: HeaderView {
                title: "AI <Assistant>".into(),
                subtitle: "Online".into(),
                avatar: None,
                status: ConnectionStatus::Limited,
                status_label: "Limited",
                closable: true,
            },
            welcome: WelcomeView {
                greeting: "Hello!".into(),
                quick_actions: vec!["I need support".into()],
            },
            messages: vec![MessageView {
                id: "m1".into(),
                kind: MessageKind::Error,
                text: "boom".into(),
                body_html: "boom".into(),
                time: "09:30".into(),
                source_count: 0,
            }],
            typing: true,
            composer: ComposerView {
                placeholder: "Ask me anything...".into(),
                text: String::new(),
                char_count_label: "0 / 2000".into(),
                near_limit: false,
                disabled: true,
                can_submit: false,
            },
        }
    }

    #[test]
    fn test_html_fragment() {
        let html = HtmlRenderer.render(&view());
        assert!(html.contains("rag-theme-dark"));
        assert!(html.contains("<h3>AI &lt;Assistant&gt;</h3>"));
        assert!(html.contains("rag-status-limited"));
        assert!(html.contains("rag-close-btn"));
        assert!(html.contains(r#"class="rag-message rag-message-error" data-id="m1""#));
        assert!(html.contains("rag-typing-indicator"));
        assert!(html.contains(r#"data-query="I need support""#));
        assert!(html.contains("disabled"));
        assert!(html.contains("0 / 2000"));
    }
}
