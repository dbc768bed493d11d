//! Configuration module for modelsql.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, LoggingSettings, Settings, SettingsError, StoreSettings, CONFIG_ENV,
};
