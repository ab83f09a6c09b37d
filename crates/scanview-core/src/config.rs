//! Configuration types for scanview.
//!
//! [`Config::load`] reads `~/.config/scanview/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[sources]
file_name        = "findings.csv"
hosting_suffix   = ".github.io"
primary_branch   = "main"
publish_branch   = "gh-pages"
fallback_owner   = "mathislef34"
fallback_project = "Udemy_Formation_Scanner"

[refresh]
interval_secs = 1800

[http]
timeout_secs = 15
user_agent   = "scanview/0.1"

[ui]
page_size      = 25
sortable       = true
search_enabled = false
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/scanview/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[sources]` section: inputs to the candidate resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Host suffix identifying a static-hosting site (`<owner><suffix>`).
    #[serde(default = "default_hosting_suffix")]
    pub hosting_suffix: String,
    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,
    #[serde(default = "default_publish_branch")]
    pub publish_branch: String,
    /// Owner/project whose mirrors are always tried last.
    #[serde(default = "default_fallback_owner")]
    pub fallback_owner: String,
    #[serde(default = "default_fallback_project")]
    pub fallback_project: String,
}

fn default_file_name() -> String { "findings.csv".to_string() }
fn default_hosting_suffix() -> String { ".github.io".to_string() }
fn default_primary_branch() -> String { "main".to_string() }
fn default_publish_branch() -> String { "gh-pages".to_string() }
fn default_fallback_owner() -> String { "mathislef34".to_string() }
fn default_fallback_project() -> String { "Udemy_Formation_Scanner".to_string() }

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            hosting_suffix: default_hosting_suffix(),
            primary_branch: default_primary_branch(),
            publish_branch: default_publish_branch(),
            fallback_owner: default_fallback_owner(),
            fallback_project: default_fallback_project(),
        }
    }
}

/// `[refresh]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 { 30 * 60 }

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: default_interval_secs() }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// `[http]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 { 15 }
fn default_user_agent() -> String { "scanview/0.1".to_string() }

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: default_user_agent() }
    }
}

/// `[ui]` section: display options handed to the rendering surface.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    #[serde(default)]
    pub search_enabled: bool,
}

fn default_page_size() -> usize { 25 }
fn default_sortable() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sortable: default_sortable(),
            search_enabled: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/scanview/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("scanview")
        .join("config.toml")
}

/// Default location of the persisted key-value store.
pub fn default_storage_path() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
        .join("scanview")
        .join("storage.json")
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.sources.file_name, "findings.csv");
        assert_eq!(cfg.sources.publish_branch, "gh-pages");
        assert_eq!(cfg.refresh.interval(), Duration::from_secs(1800));
        assert_eq!(cfg.ui.page_size, 25);
        assert!(cfg.ui.sortable);
        assert!(!cfg.ui.search_enabled);
    }

    #[test]
    fn user_toml_overrides_single_keys() {
        let cfg = Config::from_toml_str("[refresh]\ninterval_secs = 60\n[ui]\npage_size = 10\n").unwrap();
        assert_eq!(cfg.refresh.interval_secs, 60);
        assert_eq!(cfg.ui.page_size, 10);
        assert_eq!(cfg.http.timeout_secs, 15);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = Config::from_toml_str("[refresh]\ninterval_secs = 0\n").unwrap();
        assert_eq!(cfg.refresh.interval(), Duration::from_secs(1));
    }
}
