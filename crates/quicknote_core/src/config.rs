//! Application configuration.
//!
//! # Responsibility
//! - Describe where the notes database lives and how logging is set up.
//! - Load overrides from `QUICKNOTE_*` environment variables.
//!
//! # Invariants
//! - A missing variable keeps the default; an invalid one is an error.

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "QUICKNOTE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "QUICKNOTE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QUICKNOTE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, reason } => write!(f, "invalid `{key}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the `notes` table.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = non_blank(lookup(ENV_LOG_LEVEL)) {
            config.log_level = normalize_level(&level)
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    reason,
                })?
                .to_string();
        }

        if let Some(dir) = non_blank(lookup(ENV_LOG_DIR)) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    reason: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
