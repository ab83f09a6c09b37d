//! Light/dark theme preference, persisted next to the seen set.

use crate::error::StoreError;
use crate::kv::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    /// Stored preference; unknown or missing values fall back to dark.
    pub fn load(kv: &dyn KeyValueStore) -> Self {
        match kv.get(THEME_KEY) {
            Ok(Some(v)) if v == "light" => ThemePreference::Light,
            Ok(_) => ThemePreference::Dark,
            Err(e) => {
                tracing::warn!(error = %e, "theme preference unreadable");
                ThemePreference::Dark
            }
        }
    }

    pub fn save(self, kv: &dyn KeyValueStore) -> Result<(), StoreError> {
        kv.set(THEME_KEY, self.as_str())
    }
}
