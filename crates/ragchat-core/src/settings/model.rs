//! Settings domain model.

use serde::{Deserialize, Serialize};

use crate::chat::AttachmentPolicy;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions accepted by default.
pub const DEFAULT_ALLOWED_FILE_TYPES: [&str; 8] = [
    ".pdf", ".doc", ".docx", ".txt", ".png", ".jpg", ".jpeg", ".gif",
];

/// User-selected colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the platform's dark-mode preference.
    #[default]
    Auto,
}

impl Theme {
    /// Resolves `Auto` against the platform preference; `Light`/`Dark` are pinned.
    pub fn resolve(self, prefers_dark: bool) -> ResolvedTheme {
        match self {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::Auto if prefers_dark => ResolvedTheme::Dark,
            Theme::Auto => ResolvedTheme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(format!("unknown theme '{other}' (expected light, dark or auto)")),
        }
    }
}

/// The concrete theme actually applied to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

/// User preferences, persisted across runs.
///
/// Always fully populated: partially stored objects are merged over
/// [`Settings::default`] on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub sound_enabled: bool,
    pub save_history: bool,
    /// Maximum attachment size in bytes.
    pub max_file_size: u64,
    /// Allowed attachment extensions including the leading dot.
    pub allowed_file_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            sound_enabled: true,
            save_history: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Settings {
    /// Shallow merge: every field present in `patch` replaces the current one.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            theme: patch.theme.unwrap_or(self.theme),
            sound_enabled: patch.sound_enabled.unwrap_or(self.sound_enabled),
            save_history: patch.save_history.unwrap_or(self.save_history),
            max_file_size: patch.max_file_size.unwrap_or(self.max_file_size),
            allowed_file_types: patch
                .allowed_file_types
                .clone()
                .unwrap_or_else(|| self.allowed_file_types.clone()),
        }
    }

    pub fn attachment_policy(&self) -> AttachmentPolicy {
        AttachmentPolicy {
            max_file_size: self.max_file_size,
            allowed_file_types: self.allowed_file_types.clone(),
        }
    }
}

/// A partial settings object.
///
/// Used both for updates and for reading persisted data, so unknown keys are
/// ignored and missing keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub sound_enabled: Option<bool>,
    pub save_history: Option<bool>,
    pub max_file_size: Option<u64>,
    pub allowed_file_types: Option<Vec<String>>,
}

impl SettingsPatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Auto);
        assert!(settings.sound_enabled);
        assert!(settings.save_history);
        assert_eq!(settings.max_file_size, 10 * 1024 * 1024);
        assert_eq!(settings.allowed_file_types.len(), 8);
    }

    #[test]
    fn test_resolve_theme() {
        assert_eq!(Theme::Auto.resolve(true), ResolvedTheme::Dark);
        assert_eq!(Theme::Auto.resolve(false), ResolvedTheme::Light);
        assert_eq!(Theme::Light.resolve(true), ResolvedTheme::Light);
        assert_eq!(Theme::Dark.resolve(false), ResolvedTheme::Dark);
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let patch = SettingsPatch {
            sound_enabled: Some(false),
            ..SettingsPatch::default()
        };
        let merged = Settings::default().merged(&patch);
        assert!(!merged.sound_enabled);
        assert_eq!(merged.theme, Theme::Auto);
        assert!(merged.save_history);
    }

    #[test]
    fn test_patch_tolerates_missing_and_extra_keys() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"theme":"dark","fontSize":14}"#).unwrap();
        assert_eq!(patch.theme, Some(Theme::Dark));
        assert!(patch.save_history.is_none());
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
