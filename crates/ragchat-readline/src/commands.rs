//! Parsing of REPL input lines.

use std::path::PathBuf;

use ragchat_core::settings::{SettingsPatch, Theme};

/// Slash commands offered for completion in the full client.
pub const CHAT_COMMANDS: [&str; 16] = [
    "/new",
    "/history",
    "/load",
    "/clear-history",
    "/export",
    "/attach",
    "/detach",
    "/settings",
    "/set",
    "/reset-settings",
    "/scheme",
    "/status",
    "/quick",
    "/toasts",
    "/help",
    "/quit",
];

/// Slash commands offered for completion in widget mode.
pub const WIDGET_COMMANDS: [&str; 8] = [
    "/open", "/close", "/toggle", "/title", "/avatar", "/quick", "/status", "/quit",
];

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send as a chat message.
    Send(String),
    New,
    History,
    Load(String),
    ClearHistory,
    Export,
    Attach(PathBuf),
    Detach(String),
    Settings,
    Set(SettingsPatch),
    ResetSettings,
    /// The terminal background changed: `true` for dark.
    Scheme(bool),
    Status,
    Quick(usize),
    Toasts,
    Help,
    Open,
    Close,
    Toggle,
    Title(String),
    Avatar(Option<String>),
    Quit,
    /// A recognised command with bad arguments; carries the usage text.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parses a trimmed, non-empty line.
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if !line.starts_with('/') {
            return match line {
                "quit" | "exit" => Command::Quit,
                _ => Command::Send(line.to_string()),
            };
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/new" => Command::New,
            "/history" => Command::History,
            "/load" if rest.is_empty() => Command::Usage("/load <conversation-id>"),
            "/load" => Command::Load(rest.to_string()),
            "/clear-history" => Command::ClearHistory,
            "/export" => Command::Export,
            "/attach" if rest.is_empty() => Command::Usage("/attach <path>"),
            "/attach" => Command::Attach(PathBuf::from(rest)),
            "/detach" if rest.is_empty() => Command::Usage("/detach <attachment-id>"),
            "/detach" => Command::Detach(rest.to_string()),
            "/settings" => Command::Settings,
            "/set" => match rest.split_once(char::is_whitespace) {
                Some((field, value)) => match settings_patch(field, value.trim()) {
                    Some(patch) => Command::Set(patch),
                    None => Command::Usage(SET_USAGE),
                },
                None => Command::Usage(SET_USAGE),
            },
            "/reset-settings" => Command::ResetSettings,
            "/scheme" => match rest.to_ascii_lowercase().as_str() {
                "dark" => Command::Scheme(true),
                "light" => Command::Scheme(false),
                _ => Command::Usage("/scheme <dark|light>"),
            },
            "/status" => Command::Status,
            "/quick" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Quick(n - 1),
                _ => Command::Usage("/quick <number>"),
            },
            "/toasts" => Command::Toasts,
            "/help" => Command::Help,
            "/open" => Command::Open,
            "/close" => Command::Close,
            "/toggle" => Command::Toggle,
            "/title" if rest.is_empty() => Command::Usage("/title <text>"),
            "/title" => Command::Title(rest.to_string()),
            "/avatar" => Command::Avatar((!rest.is_empty()).then(|| rest.to_string())),
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

const SET_USAGE: &str = "/set <theme|sound|save-history|max-file-size|allowed-types> <value>";

/// Builds a one-field patch from a `/set` command.
///
/// `max-file-size` is given in MB; `allowed-types` is a comma-separated list of
/// extensions, with or without the leading dot.
fn settings_patch(field: &str, value: &str) -> Option<SettingsPatch> {
    let mut patch = SettingsPatch::default();
    match field {
        "theme" => patch.theme = Some(value.parse::<Theme>().ok()?),
        "sound" => patch.sound_enabled = Some(parse_switch(value)?),
        "save-history" => patch.save_history = Some(parse_switch(value)?),
        "max-file-size" => {
            let mb: u64 = value.trim_end_matches("MB").trim().parse().ok()?;
            patch.max_file_size = Some(mb.checked_mul(1024 * 1024)?);
        }
        "allowed-types" => {
            let types: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(|ext| {
                    let ext = ext.to_lowercase();
                    if ext.starts_with('.') { ext } else { format!(".{ext}") }
                })
                .collect();
            if types.is_empty() {
                return None;
            }
            patch.allowed_file_types = Some(types);
        }
        _ => return None,
    }
    Some(patch)
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
