//! Theme and layout preferences.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::PersistedState;

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "theme-storage";

/// Storage key of the layout preference.
pub const UI_KEY: &str = "ui-storage";

/// Color scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeState {
    /// Render with the dark palette.
    #[serde(rename = "isDarkMode")]
    pub dark_mode: bool,
}

impl ThemeState {
    /// Flip between light and dark.
    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        info!("Theme set to {}", if self.dark_mode { "dark" } else { "light" });
    }
}

impl PersistedState for ThemeState {
    const KEY: &'static str = THEME_KEY;
    type Snapshot = Self;

    fn snapshot(&self) -> Self {
        *self
    }

    fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }
}

/// Layout chrome preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    /// Show the navigation sidebar.
    pub sidebar_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { sidebar_open: true }
    }
}

impl UiState {
    /// Show or hide the sidebar.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        info!("Sidebar {}", if self.sidebar_open { "shown" } else { "hidden" });
    }
}

impl PersistedState for UiState {
    const KEY: &'static str = UI_KEY;
    type Snapshot = Self;

    fn snapshot(&self) -> Self {
        *self
    }

    fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }
}
