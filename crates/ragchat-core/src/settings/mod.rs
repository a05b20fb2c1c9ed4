//! Settings domain module.
//!
//! - `model`: `Settings`, `SettingsPatch`, `Theme`
//! - `theme`: traits for the theme side effect and the platform dark-mode signal
//! - `store`: `SettingsStore`, persisted through `LocalStore`

mod model;
mod store;
mod theme;

pub use model::{
    DEFAULT_ALLOWED_FILE_TYPES, DEFAULT_MAX_FILE_SIZE, ResolvedTheme, Settings, SettingsPatch,
    Theme,
};
pub use store::SettingsStore;
pub use theme::{ColorSchemeSource, FixedColorScheme, NoopThemeApplier, ThemeApplier};
