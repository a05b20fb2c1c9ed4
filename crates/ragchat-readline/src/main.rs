//! `ragchat` - terminal client for a RAG chat backend.
//!
//! Runs either the full chat client (history, settings, attachments, export)
//! or, with `--embedded`, the lightweight widget surface.

mod commands;
mod helper;
mod terminal;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use ragchat_application::widget::{Renderer, WidgetConfig, WidgetHost};
use ragchat_application::{ChatApp, QUICK_ACTIONS};
use ragchat_core::chat::{Composer, Message, SendOutcome};
use ragchat_core::config::ClientConfig;
use ragchat_core::connection::HealthProbe;
use ragchat_core::storage::LocalStore;
use ragchat_infrastructure::{
    ConfigService, DirectoryExportSink, EnvColorScheme, FileBackend, RagChatPaths, load_attachment,
};
use ragchat_interaction::{HttpChatBackend, HttpHealthProbe};

use crate::commands::{CHAT_COMMANDS, Command, WIDGET_COMMANDS};
use crate::helper::CliHelper;
use crate::terminal::{
    BellSoundCue, TerminalColorScheme, TerminalRenderer, TerminalTheme, print_conversation, print_message,
    print_new_toasts, status_text,
};

/// Chat with your knowledge base from the terminal.
#[derive(Parser, Debug)]
#[command(name = "ragchat", version, about)]
struct Cli {
    /// Base URL of the chat API (overrides config and RAGCHAT_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Directory for persisted settings and history.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the embeddable widget surface instead of the full client.
    #[arg(long)]
    embedded: bool,

    /// Widget title (widget mode only).
    #[arg(long)]
    title: Option<String>,

    /// Widget theme: light, dark or auto (widget mode only).
    #[arg(long)]
    theme: Option<String>,

    /// Enable debug logging for ragchat crates.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,ragchat_core=debug,ragchat_infrastructure=debug,ragchat_interaction=debug,\
         ragchat_application=debug,ragchat=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// File, then environment, then command line.
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = service.load()?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    tracing::debug!("[Bootstrap] Using API at {}", config.api_base_url);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    if cli.embedded {
        return run_widget(&cli, &config).await;
    }

    let backend = Arc::new(HttpChatBackend::from_config(&config)?);
    let probe = Arc::new(HttpHealthProbe::from_config(&config)?);
    run_chat(&config, backend, probe).await
}

// ============================================================================
// Full client
// ============================================================================

async fn run_chat(
    config: &ClientConfig,
    backend: Arc<HttpChatBackend>,
    probe: Arc<HttpHealthProbe>,
) -> Result<()> {
    let paths = RagChatPaths::new(config.data_dir.clone());
    let store = LocalStore::new(Arc::new(FileBackend::new(paths.storage_dir()?)));
    let theme = Arc::new(TerminalTheme::default());
    let scheme = Arc::new(TerminalColorScheme::detect());

    let app = ChatApp::builder(store, backend)
        .config(config.clone())
        .health_probe(probe)
        .theme(theme.clone(), scheme.clone())
        .export_sink(Arc::new(DirectoryExportSink::new(paths.downloads_dir()?)))
        .sound_cue(Arc::new(BellSoundCue))
        .build();

    // Print connection changes as they happen
    if let Some(mut status_rx) = app.subscribe_connection() {
        tokio::spawn(async move {
            while status_rx.changed().await.is_ok() {
                let status = *status_rx.borrow_and_update();
                println!("{} {}", "Connection:".bright_black(), status_text(status));
            }
        });
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(&CHAT_COMMANDS)));

    println!("{}", "=== RagChat ===".bright_magenta().bold());
    println!("{}", "Ask a question, or type /help for commands.".bright_black());
    println!();

    let mut composer = Composer::new();
    let mut shown = 0usize;
    let mut seen_toasts = HashSet::new();

    if app.resume_current().await {
        println!("{}", "Resumed your last conversation.".bright_black());
        print_since(&theme, &app.snapshot().await.messages, &mut shown);
    } else {
        print_quick_actions(&theme);
    }

    loop {
        let prompt = if composer.attachments().is_empty() {
            ">> ".to_string()
        } else {
            format!("[{} attached] >> ", composer.attachments().len())
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Command::Send(text) => {
                composer.set_text(text);
                send_from_composer(&app, &theme, &mut composer, &mut shown).await;
            }
            Command::Quick(index) => match QUICK_ACTIONS.get(index) {
                Some((_, query)) => {
                    composer.set_text(*query);
                    send_from_composer(&app, &theme, &mut composer, &mut shown).await;
                }
                None => println!("{}", format!("No quick action {}", index + 1).yellow()),
            },
            Command::New => {
                app.new_conversation().await;
                composer = Composer::new();
                shown = 0;
                println!("{}", "Started a new conversation.".bright_black());
                print_quick_actions(&theme);
            }
            Command::History => {
                let conversations = app.conversations().await;
                let current = app.current_conversation_id().await;
                if conversations.is_empty() {
                    println!("{}", "No saved conversations.".bright_black());
                }
                for summary in &conversations {
                    print_conversation(&theme, summary, current.as_deref() == Some(&summary.id));
                }
            }
            Command::Load(id) => {
                if app.load_conversation(&id).await.is_ok() {
                    shown = 0;
                    print_since(&theme, &app.snapshot().await.messages, &mut shown);
                }
            }
            Command::ClearHistory => {
                if confirm(&mut rl, "Clear all conversation history?")? {
                    app.clear_history().await;
                }
            }
            Command::Export => {
                if let Ok(path) = app.export_history().await {
                    println!("{}", format!("Saved to {}", path.display()).bright_black());
                }
            }
            Command::Attach(path) => {
                let policy = app.attachment_policy().await;
                let added = load_attachment(&path, &policy)
                    .and_then(|attachment| {
                        let summary = format!("{} ({})", attachment.name, attachment.id);
                        composer.add_attachment(attachment, &policy).map(|_| summary)
                    });
                match added {
                    Ok(summary) => println!("{}", format!("Attached {summary}").bright_black()),
                    Err(e) => {
                        app.toasts().error("Attachment rejected", Some(e.to_string()));
                    }
                }
            }
            Command::Detach(id) => {
                if composer.remove_attachment(&id) {
                    println!("{}", "Attachment removed.".bright_black());
                } else {
                    println!("{}", format!("No pending attachment {id}").yellow());
                }
            }
            Command::Settings => print_settings(&app).await,
            Command::Set(patch) => {
                app.update_settings(patch).await;
                app.toasts().success("Settings saved", None);
            }
            Command::ResetSettings => {
                app.reset_settings().await;
                app.toasts().success("Settings reset to defaults", None);
            }
            Command::Scheme(dark) => {
                if scheme.set_dark(dark) {
                    app.on_color_scheme_changed().await;
                }
                println!("Theme: {:?}", app.resolved_theme().await);
            }
            Command::Status => {
                let snapshot = app.snapshot().await;
                println!("Connection:    {}", status_text(app.connection_status()));
                println!("Session:       {:?} ({} messages)", snapshot.status, snapshot.messages.len());
                println!("Saved:         {} conversations", app.conversations().await.len());
                if let Some(id) = app.current_conversation_id().await {
                    println!("Current:       {id}");
                }
                println!("Draft:         {}", composer.char_count_label());
            }
            Command::Toasts => {
                for toast in app.toasts().toasts() {
                    println!("{:?}: {}", toast.kind, toast.title);
                }
            }
            Command::Help => print_help(),
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Command::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
            Command::Unknown(name) => {
                println!("{}", format!("Unknown command {name}. Type /help.").bright_black())
            }
            Command::Open | Command::Close | Command::Toggle | Command::Title(_) | Command::Avatar(_) => {
                println!("{}", "Only available with --embedded.".bright_black())
            }
        }

        print_new_toasts(&app.toasts().toasts(), &mut seen_toasts);
    }

    Ok(())
}

async fn send_from_composer(
    app: &ChatApp,
    theme: &TerminalTheme,
    composer: &mut Composer,
    shown: &mut usize,
) {
    if composer.is_over_limit() {
        println!(
            "{}",
            format!("Message is too long ({}).", composer.char_count_label()).yellow()
        );
        return;
    }

    println!("{}", theme.muted("Thinking..."));
    match app.submit(composer).await {
        Some(SendOutcome::Discarded) => {
            println!("{}", theme.muted("(reply discarded)"));
        }
        Some(_) => {}
        None => {
            println!("{}", "Nothing to send.".bright_black());
            return;
        }
    }
    print_since(theme, &app.snapshot().await.messages, shown);
}

fn print_since(theme: &TerminalTheme, messages: &[Message], shown: &mut usize) {
    if messages.len() < *shown {
        *shown = 0;
    }
    for message in &messages[*shown..] {
        print_message(theme, message);
    }
    *shown = messages.len();
}

fn print_quick_actions(theme: &TerminalTheme) {
    println!("{}", theme.muted("Try one of these:"));
    for (i, (title, query)) in QUICK_ACTIONS.iter().enumerate() {
        println!("  /quick {}  {}  {}", i + 1, title.bold(), theme.muted(query));
    }
    println!();
}

async fn print_settings(app: &ChatApp) {
    let settings = app.settings().await;
    println!("theme          {:?} ({:?})", settings.theme, app.resolved_theme().await);
    println!("sound          {}", on_off(settings.sound_enabled));
    println!("save-history   {}", on_off(settings.save_history));
    println!("max-file-size  {}MB", settings.max_file_size / (1024 * 1024));
    println!("allowed-types  {}", settings.allowed_file_types.join(", "));
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn print_help() {
    let rows = [
        ("/new", "start a new conversation"),
        ("/history", "list saved conversations"),
        ("/load <id>", "continue a saved conversation"),
        ("/clear-history", "delete all saved conversations"),
        ("/export", "write history to your downloads folder"),
        ("/attach <path>", "attach a file to the next message"),
        ("/detach <id>", "remove a pending attachment"),
        ("/settings", "show settings"),
        ("/set <field> <value>", "change a setting"),
        ("/reset-settings", "restore default settings"),
        ("/scheme <dark|light>", "tell auto theme the terminal background changed"),
        ("/status", "connection and session status"),
        ("/quick <n>", "ask a suggested question"),
        ("/toasts", "show current notifications"),
        ("/quit", "exit"),
    ];
    for (command, description) in rows {
        println!("  {:<22} {}", command.bright_cyan(), description.bright_black());
    }
}

fn confirm<H: rustyline::Helper, I: rustyline::history::History>(
    rl: &mut Editor<H, I>,
    question: &str,
) -> Result<bool> {
    match rl.readline(&format!("{question} [y/N] ")) {
        Ok(answer) => Ok(matches!(answer.trim(), "y" | "Y" | "yes")),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

// ============================================================================
// Widget surface
// ============================================================================

async fn run_widget(cli: &Cli, config: &ClientConfig) -> Result<()> {
    let mut widget_config = WidgetConfig::embedded("terminal").with_client_config(config);
    if let Some(title) = &cli.title {
        widget_config.title = title.clone();
    }
    if let Some(theme) = &cli.theme {
        widget_config.theme = theme.parse().map_err(anyhow::Error::msg)?;
    }

    let backend_config = widget_config.backend_config(config);
    let backend = Arc::new(HttpChatBackend::from_config(&backend_config)?);
    let probe: Arc<dyn HealthProbe> = Arc::new(HttpHealthProbe::from_config(&backend_config)?);

    let host = WidgetHost::new().with_color_scheme(Arc::new(EnvColorScheme));
    let mut widget = host.mount(widget_config, backend, Some(probe))?;
    let mut renderer = TerminalRenderer::default();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(&WIDGET_COMMANDS)));
    print!("{}", renderer.render(&widget.view().await));

    loop {
        let line = match rl.readline(&format!("{} ", widget.config().placeholder.bright_black())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Command::Send(text) => {
                widget.composer_mut().set_text(text);
                if widget.submit().await.is_none() {
                    println!("{}", "Nothing to send.".bright_black());
                }
            }
            Command::Quick(index) => {
                if widget.send_quick_action(index).await.is_none() {
                    println!("{}", format!("No quick action {}", index + 1).yellow());
                }
            }
            Command::Open => widget.open(),
            Command::Close => widget.close(),
            Command::Toggle => widget.toggle(),
            Command::Title(title) => widget.set_title(title),
            Command::Avatar(avatar) => widget.set_avatar(avatar),
            Command::Status => println!("Connection: {}", status_text(widget.connection_status())),
            Command::Quit => break,
            Command::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
            _ => println!("{}", "Not available in widget mode.".bright_black()),
        }

        print!("{}", renderer.render(&widget.view().await));
    }

    widget.destroy();
    Ok(())
}
