//! # rp-config
//!
//! Layered settings for the portal binary: built-in defaults, an optional
//! TOML file, then `PORTAL_`-prefixed environment variables
//! (`PORTAL_GATEWAY__MODEL=...`). A `.env` file is honoured when present.

use std::path::{Path, PathBuf};

use rp_core::LevelUpPolicy;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Legacy variable the portal front end read its gateway key from.
const LEGACY_API_KEY_VAR: &str = "API_KEY";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub progression: ProgressionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per entry under `path`
    #[default]
    File,
    /// Key/value table in the database at `sqlite_url`
    Sqlite,
    /// Nothing survives the process
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    #[serde(default = "default_sqlite_url")]
    pub sqlite_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            sqlite_url: default_sqlite_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Absent or empty means the assistants answer with the
    /// "not configured" message.
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressionSettings {
    #[serde(default)]
    pub level_up: LevelUpPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_sqlite_url() -> String {
    "sqlite:portal.db?mode=rwc".to_string()
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Loads `.env`, then layers `path` (if given) and the environment over
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            tracing::debug!(path = %dotenv.display(), "loaded .env");
        }

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PORTAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.gateway.normalize_api_key(std::env::var(LEGACY_API_KEY_VAR).ok());
        Ok(settings)
    }
}

impl GatewaySettings {
    /// Drops an empty key and falls back to the legacy variable.
    fn normalize_api_key(&mut self, legacy: Option<String>) {
        use secrecy::ExposeSecret;

        let usable = |key: &SecretString| !key.expose_secret().trim().is_empty();
        if self.api_key.as_ref().is_some_and(usable) {
            return;
        }
        self.api_key = legacy
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
