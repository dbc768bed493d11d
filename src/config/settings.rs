//! TOML-based configuration for modelsql.
//!
//! Example configuration:
//! ```toml
//! [store]
//! path = "${HOME}/data/jobs.db"   # ":memory:" for a scratch database
//! dialect = "sqlite"
//!
//! [logging]
//! filter = "modelsql=debug,info"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::sql::Dialect;

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}|\$([A-Za-z0-9_]+)").unwrap());

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MODELSQL_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

/// Relational store configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Database file, or `:memory:`. Supports `${VAR}` expansion.
    pub path: String,

    /// Dialect used to quote generated SQL.
    pub dialect: Dialect,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            dialect: Dialect::default(),
        }
    }
}

impl StoreSettings {
    /// The store path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.path).map(PathBuf::from)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is
    /// unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `MODELSQL_CONFIG`
    /// 2. `./modelsql.toml`
    /// 3. `<config dir>/modelsql/config.toml`
    ///
    /// Falls back to defaults when none exists.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }

        let local = PathBuf::from("modelsql.toml");
        if local.exists() {
            return Self::from_file(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("modelsql").join("config.toml");
            if user.exists() {
                return Self::from_file(user);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR`. A `$` not followed by a name is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in ENV_REFERENCE.captures_iter(s) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&s[last..whole.start()]);
        result.push_str(&lookup(&caps)?);
        last = whole.end();
    }

    result.push_str(&s[last..]);
    Ok(result)
}

fn lookup(caps: &Captures<'_>) -> Result<String, SettingsError> {
    let name = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();
    env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))
}
