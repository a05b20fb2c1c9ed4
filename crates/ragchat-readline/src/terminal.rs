//! Terminal output: message printing, widget rendering, theme and sound.

use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::{ColoredString, Colorize};
use ragchat_application::SoundCue;
use ragchat_application::widget::{MessageKind, Renderer, WidgetView};
use ragchat_core::chat::{Message, MessageRole, Source};
use ragchat_core::connection::ConnectionStatus;
use ragchat_core::history::ConversationSummary;
use ragchat_core::settings::{ColorSchemeSource, ResolvedTheme, ThemeApplier};
use ragchat_infrastructure::EnvColorScheme;
use ragchat_core::text::{format_date, format_time};
use ragchat_core::toast::{Toast, ToastKind};

/// Tracks the resolved theme so output colors suit the terminal background.
#[derive(Debug, Default)]
pub struct TerminalTheme {
    dark: AtomicBool,
}

impl TerminalTheme {
    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    pub fn assistant(&self, text: &str) -> ColoredString {
        if self.is_dark() {
            text.bright_blue()
        } else {
            text.blue()
        }
    }

    pub fn user(&self, text: &str) -> ColoredString {
        if self.is_dark() {
            text.bright_green()
        } else {
            text.green()
        }
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        if self.is_dark() {
            text.bright_black()
        } else {
            text.dimmed()
        }
    }
}

impl ThemeApplier for TerminalTheme {
    fn apply(&self, theme: ResolvedTheme) {
        self.dark.store(theme == ResolvedTheme::Dark, Ordering::Relaxed);
        tracing::debug!("[Terminal] Theme applied: {:?}", theme);
    }
}

/// Terminal background preference, detected at start-up and updated by `/scheme`.
#[derive(Debug, Default)]
pub struct TerminalColorScheme {
    dark: AtomicBool,
}

impl TerminalColorScheme {
    pub fn detect() -> Self {
        Self {
            dark: AtomicBool::new(EnvColorScheme.prefers_dark()),
        }
    }

    /// Records the new preference; returns whether it changed.
    pub fn set_dark(&self, dark: bool) -> bool {
        self.dark.swap(dark, Ordering::Relaxed) != dark
    }
}

impl ColorSchemeSource for TerminalColorScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }
}

/// Rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellSoundCue;

impl SoundCue for BellSoundCue {
    fn message_sent(&self) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

pub fn status_text(status: ConnectionStatus) -> ColoredString {
    let label = status.label();
    match status {
        ConnectionStatus::Online => label.green(),
        ConnectionStatus::Limited => label.yellow(),
        ConnectionStatus::Offline => label.red(),
        ConnectionStatus::Unknown => label.bright_black(),
    }
}

fn source_line(source: &Source) -> String {
    let mut line = format!("{} ({:.0}%)", source.filename, source.similarity * 100.0);
    if let Some(collection) = &source.collection {
        line.push_str(&format!(" [{collection}]"));
    }
    if let Some(url) = &source.url {
        line.push_str(&format!(" {url}"));
    }
    line
}

/// Prints one chat message with its sources and attachments.
pub fn print_message(theme: &TerminalTheme, message: &Message) {
    let time = format_time(&message.timestamp);
    match (message.role, message.is_error) {
        (_, true) => {
            println!("{} {}", theme.muted(&time), "Assistant".red().bold());
            for line in message.content.lines() {
                println!("  {}", line.red());
            }
        }
        (MessageRole::User, false) => {
            println!("{} {}", theme.muted(&time), "You".bold());
            for line in message.content.lines() {
                println!("  {}", theme.user(line));
            }
        }
        (MessageRole::Assistant, false) => {
            println!("{} {}", theme.muted(&time), "Assistant".bold());
            for line in message.content.lines() {
                println!("  {}", theme.assistant(line));
            }
        }
    }

    for attachment in message.attachments.iter().flatten() {
        println!(
            "  {}",
            theme.muted(&format!("attached: {} ({} bytes)", attachment.name, attachment.size))
        );
    }
    if let Some(sources) = message.sources.as_ref().filter(|s| !s.is_empty()) {
        println!("  {}", theme.muted(&format!("Sources ({}):", sources.len())));
        for source in sources {
            println!("    {}", theme.muted(&source_line(source)));
        }
    }
    println!();
}

/// Prints toasts not seen before and remembers them.
pub fn print_new_toasts(toasts: &[Toast], seen: &mut HashSet<String>) {
    for toast in toasts {
        if !seen.insert(toast.id.clone()) {
            continue;
        }
        let title = match toast.kind {
            ToastKind::Success => format!("✓ {}", toast.title).green(),
            ToastKind::Error => format!("✗ {}", toast.title).red(),
            ToastKind::Warning => format!("! {}", toast.title).yellow(),
            ToastKind::Info => format!("i {}", toast.title).cyan(),
        };
        match &toast.message {
            Some(message) => println!("{title}: {message}"),
            None => println!("{title}"),
        }
    }
}

pub fn print_conversation(theme: &TerminalTheme, summary: &ConversationSummary, current: bool) {
    let marker = if current { "*" } else { " " };
    println!(
        "{marker} {} {}  {}",
        summary.id.bright_cyan(),
        summary.title.bold(),
        theme.muted(&format!(
            "{} messages, {}",
            summary.message_count,
            format_date(&summary.last_updated)
        ))
    );
    println!("    {}", theme.muted(&summary.preview));
}

/// Renders [`WidgetView`] incrementally: each call returns only what changed
/// since the previous call.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    printed: Vec<String>,
    header: Option<String>,
    was_typing: bool,
}

impl Renderer for TerminalRenderer {
    type Output = String;

    fn render(&mut self, view: &WidgetView) -> String {
        let mut out = String::new();

        let header = format!(
            "{}{} · {} · {}",
            view.header
                .avatar
                .as_ref()
                .map(|a| format!("[{a}] "))
                .unwrap_or_default(),
            view.header.title,
            view.header.subtitle,
            view.header.status_label
        );
        if self.header.as_deref() != Some(header.as_str()) {
            out.push_str(&format!("{}\n", format!("== {header} ==").bold()));
            if self.header.is_none() {
                out.push_str(&format!("{}\n", view.welcome.greeting));
                for (i, query) in view.welcome.quick_actions.iter().enumerate() {
                    out.push_str(&format!("  /quick {} → {}\n", i + 1, query));
                }
            }
            self.header = Some(header);
        }

        if !view.is_open {
            out.push_str(&format!("{}\n", "(chat closed, /open to show it)".bright_black()));
            return out;
        }

        // Session was cleared
        if view.messages.len() < self.printed.len()
            || view
                .messages
                .iter()
                .zip(&self.printed)
                .any(|(message, id)| &message.id != id)
        {
            self.printed.clear();
        }

        let dark = view.theme == ResolvedTheme::Dark;
        for message in view.messages.iter().skip(self.printed.len()) {
            let (who, body) = match message.kind {
                MessageKind::User if dark => ("You".bold(), message.text.bright_green()),
                MessageKind::User => ("You".bold(), message.text.green()),
                MessageKind::Assistant if dark => ("Assistant".bold(), message.text.bright_blue()),
                MessageKind::Assistant => ("Assistant".bold(), message.text.blue()),
                MessageKind::Error => ("Assistant".red().bold(), message.text.red()),
            };
            out.push_str(&format!("{} {}\n  {}\n", message.time.bright_black(), who, body));
            self.printed.push(message.id.clone());
        }

        if view.typing && !self.was_typing {
            out.push_str(&format!("{}\n", "Assistant is typing...".bright_black()));
        }
        self.was_typing = view.typing;

        out
    }
}
