//! Theme side effects.

use super::model::ResolvedTheme;

/// Receives the resolved theme whenever it must be (re)applied to the UI.
pub trait ThemeApplier: Send + Sync {
    fn apply(&self, theme: ResolvedTheme);
}

/// Platform signal for "prefers dark colour scheme".
pub trait ColorSchemeSource: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

/// Applier that ignores theme changes, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopThemeApplier;

impl ThemeApplier for NoopThemeApplier {
    fn apply(&self, _theme: ResolvedTheme) {}
}

/// A colour-scheme source with a fixed answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedColorScheme {
    pub prefers_dark: bool,
}

impl ColorSchemeSource for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }
}
