//! Layered configuration loading.
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. User-global `~/.config/civicmate/config.toml`
//! 3. Project-local `./civicmate.toml`
//! 4. Environment variables (`CIVICMATE_*`, `__` separates sections)
//!
//! `CIVICMATE_API__BASE_URL` maps to `api.base_url`,
//! `CIVICMATE_UI__DEFAULT_LANGUAGE` to `ui.default_language`, and so on.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PREFIX: &str = "CIVICMATE_";
pub const LOCAL_CONFIG_FILE: &str = "civicmate.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Connect timeout for the HTTP client. Unset leaves the transport default.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiConfig {
    pub default_language: String,
    pub languages: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_language: "English".to_string(),
            languages: vec![
                "English".to_string(),
                "Hindi".to_string(),
                "Marathi".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load from all sources without touching `.env`.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory first, then all sources.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("civicmate").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: format!("expected an http(s) URL, got `{base_url}`"),
            });
        }

        if self.ui.languages.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ui.languages".to_string(),
                reason: "at least one language is required".to_string(),
            });
        }

        if !self.ui.languages.contains(&self.ui.default_language) {
            return Err(ConfigError::InvalidValue {
                field: "ui.default_language".to_string(),
                reason: format!(
                    "`{}` is not one of the configured languages",
                    self.ui.default_language
                ),
            });
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim().trim_end_matches('/')
    }
}
