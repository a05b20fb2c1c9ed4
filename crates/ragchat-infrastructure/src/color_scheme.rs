//! Terminal colour-scheme detection.

use ragchat_core::settings::ColorSchemeSource;

/// Explicit preference: `dark` or `light`.
pub const ENV_COLOR_SCHEME: &str = "RAGCHAT_COLOR_SCHEME";

/// Reads the user's dark/light preference from the environment.
///
/// `RAGCHAT_COLOR_SCHEME` wins when set. Otherwise the background index in
/// `COLORFGBG` (as exported by rxvt, Konsole and others) is used, where
/// indexes 0-6 and 8 are dark. With neither available the answer is light.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvColorScheme;

impl ColorSchemeSource for EnvColorScheme {
    fn prefers_dark(&self) -> bool {
        prefers_dark_from(
            std::env::var(ENV_COLOR_SCHEME).ok().as_deref(),
            std::env::var("COLORFGBG").ok().as_deref(),
        )
    }
}

fn prefers_dark_from(explicit: Option<&str>, colorfgbg: Option<&str>) -> bool {
    if let Some(value) = explicit {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => return true,
            "light" => return false,
            _ => {}
        }
    }

    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6 || bg == 8)
        .unwrap_or(false)
}
