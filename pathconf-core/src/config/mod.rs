//! Configuration management for pathconf
//!
//! Settings for where the backing stores live and how logging is set up.
//! Values come from defaults, a TOML file, or `PATHCONF_*` environment
//! variables, and are validated before use.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

mod error;

pub use error::ConfigError;

use crate::logging::{LogConfig, LogLevel};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Backing store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// TOML file behind the nested store
    pub file_path: PathBuf,

    /// Start from an empty document when the file does not exist
    pub create_missing: bool,

    /// Name of the hash holding flattened configuration in the remote store
    pub hash_root: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("./config.toml"),
            create_missing: true,
            hash_root: "config".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Convert to the logging subsystem's configuration.
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level = LogLevel::parse(&self.level).map_err(|e| ConfigError::InvalidValue {
            key: "logging.level".to_string(),
            message: e.to_string(),
        })?;
        Ok(LogConfig::new(level)
            .with_timestamp(self.with_timestamp)
            .with_target(self.with_target)
            .json_format(self.json_format))
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    raw.parse().map_err(|e: std::str::ParseBoolError| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: PATHCONF_<SECTION>_<KEY>
    /// Example: PATHCONF_STORE_HASH_ROOT=service-config
    ///
    /// Recognized: `PATHCONF_STORE_FILE_PATH`, `PATHCONF_STORE_CREATE_MISSING`,
    /// `PATHCONF_STORE_HASH_ROOT`, `PATHCONF_LOG_LEVEL`, `PATHCONF_LOG_JSON`,
    /// `PATHCONF_LOG_TIMESTAMP`, `PATHCONF_LOG_TARGET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Store config
        if let Some(path) = lookup("PATHCONF_STORE_FILE_PATH") {
            config.store.file_path = PathBuf::from(path);
        }
        if let Some(flag) = lookup("PATHCONF_STORE_CREATE_MISSING") {
            config.store.create_missing = parse_flag("PATHCONF_STORE_CREATE_MISSING", &flag)?;
        }
        if let Some(root) = lookup("PATHCONF_STORE_HASH_ROOT") {
            config.store.hash_root = root;
        }

        // Logging config
        if let Some(level) = lookup("PATHCONF_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = lookup("PATHCONF_LOG_JSON") {
            config.logging.json_format = parse_flag("PATHCONF_LOG_JSON", &json)?;
        }
        if let Some(timestamp) = lookup("PATHCONF_LOG_TIMESTAMP") {
            config.logging.with_timestamp = parse_flag("PATHCONF_LOG_TIMESTAMP", &timestamp)?;
        }
        if let Some(target) = lookup("PATHCONF_LOG_TARGET") {
            config.logging.with_target = parse_flag("PATHCONF_LOG_TARGET", &target)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.file_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "store.file_path must not be empty".to_string(),
            ));
        }

        if self.store.hash_root.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "store.hash_root must not be empty".to_string(),
            ));
        }

        if LogLevel::parse(&self.logging.level).is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}
