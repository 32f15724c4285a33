//! Client settings and home-relative paths.
//!
//! Resolution order: built-in defaults, then `<home>/.sdi/config.toml`, then
//! environment overrides (`SDI_API_URL`, `SDI_STORAGE_SECRET`,
//! `SDI_STORE_NAMESPACE`, `SDI_SUCCESS_DELAY_MS`).
//!
//! As elsewhere, every function touching the filesystem has an `_at(home)`
//! form; tests must use it instead of the `dirs::home_dir()` wrappers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::SettingsError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_NAMESPACE: &str = "registration";
pub const DEFAULT_STORAGE_SECRET: &str = "sdi25-registration-wizard";
pub const DEFAULT_SUCCESS_DELAY_MS: u64 = 3000;

pub const ENV_API_URL: &str = "SDI_API_URL";
pub const ENV_STORAGE_SECRET: &str = "SDI_STORAGE_SECRET";
pub const ENV_NAMESPACE: &str = "SDI_STORE_NAMESPACE";
pub const ENV_SUCCESS_DELAY_MS: &str = "SDI_SUCCESS_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL, without trailing slash.
    pub api_url: String,
    /// Store file name under `~/.sdi/storage/`.
    pub namespace: String,
    /// Secret the storage encryption key is derived from.
    pub storage_secret: String,
    /// How long the success screen stays up after a registration.
    pub success_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_secret: DEFAULT_STORAGE_SECRET.to_string(),
            success_delay_ms: DEFAULT_SUCCESS_DELAY_MS,
        }
    }
}

impl Settings {
    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_API_URL) {
            self.api_url = v;
        }
        if let Some(v) = lookup(ENV_STORAGE_SECRET) {
            self.storage_secret = v;
        }
        if let Some(v) = lookup(ENV_NAMESPACE) {
            self.namespace = v;
        }
        if let Some(v) = lookup(ENV_SUCCESS_DELAY_MS) {
            self.success_delay_ms = v.trim().parse().map_err(|_| SettingsError::InvalidEnv {
                var: ENV_SUCCESS_DELAY_MS,
                value: v.clone(),
            })?;
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.sdi/`
pub fn sdi_root(home: &Path) -> PathBuf {
    home.join(".sdi")
}

/// `<home>/.sdi/config.toml`
pub fn config_path_at(home: &Path) -> PathBuf {
    sdi_root(home).join("config.toml")
}

/// `<home>/.sdi/storage/`
pub fn storage_dir_at(home: &Path) -> PathBuf {
    sdi_root(home).join("storage")
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load settings for `home` using the process environment for overrides.
pub fn load_at(home: &Path) -> Result<Settings, SettingsError> {
    load_with(home, |var| std::env::var(var).ok())
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, SettingsError> {
    let home = dirs::home_dir().ok_or(SettingsError::HomeNotFound)?;
    load_at(&home)
}

/// Load settings for `home` with an explicit override lookup.
pub fn load_with<F>(home: &Path, lookup: F) -> Result<Settings, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = config_path_at(home);
    let mut settings = if path.exists() {
        let raw = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| SettingsError::Parse { path, source })?
    } else {
        Settings::default()
    };
    settings.apply_overrides(lookup)?;
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
