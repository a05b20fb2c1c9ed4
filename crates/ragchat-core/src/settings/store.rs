//! Settings store.

use std::sync::Arc;

use super::model::{ResolvedTheme, Settings, SettingsPatch, Theme};
use super::theme::{ColorSchemeSource, ThemeApplier};
use crate::storage::{LocalStore, keys};

/// Typed user preferences persisted through [`LocalStore`].
///
/// The store owns the theme side effect: every load, update and reset resolves
/// the theme and hands it to the [`ThemeApplier`].
pub struct SettingsStore {
    store: LocalStore,
    settings: Settings,
    applier: Arc<dyn ThemeApplier>,
    color_scheme: Arc<dyn ColorSchemeSource>,
}

impl SettingsStore {
    /// Loads persisted settings (merged over defaults) and applies the theme.
    pub fn load(
        store: LocalStore,
        applier: Arc<dyn ThemeApplier>,
        color_scheme: Arc<dyn ColorSchemeSource>,
    ) -> Self {
        let persisted: SettingsPatch = store.get(keys::SETTINGS, SettingsPatch::default());
        let settings = Settings::default().merged(&persisted);
        tracing::debug!("[Settings] Loaded settings: theme={:?}", settings.theme);

        let this = Self {
            store,
            settings,
            applier,
            color_scheme,
        };
        this.apply_theme();
        this
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shallow-merges `patch`, persists the result and re-applies the theme.
    pub fn update(&mut self, patch: SettingsPatch) -> Settings {
        self.settings = self.settings.merged(&patch);
        self.store.set(keys::SETTINGS, &self.settings);
        self.apply_theme();
        self.settings.clone()
    }

    /// Restores defaults, removes the persisted entry and re-applies the theme.
    pub fn reset(&mut self) -> Settings {
        self.settings = Settings::default();
        self.store.remove(keys::SETTINGS);
        self.apply_theme();
        self.settings.clone()
    }

    /// Notification hook for platform dark-mode changes.
    ///
    /// Only re-applies while the theme is `Auto`; pinned themes ignore the signal.
    pub fn on_color_scheme_changed(&self) {
        if self.settings.theme == Theme::Auto {
            self.apply_theme();
        }
    }

    /// The theme currently in effect.
    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.settings
            .theme
            .resolve(self.color_scheme.prefers_dark())
    }

    fn apply_theme(&self) {
        self.applier.apply(self.resolved_theme());
    }
}
