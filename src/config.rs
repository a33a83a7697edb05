//! Session and guard configuration.
//!
//! Browser hosts have no process environment, so configuration arrives as a
//! JSON object (typically embedded in the page by the server). Every field is
//! optional and falls back to the `DEFAULT_*` constants.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::session::ADMIN_ROLE;
use crate::auth::store::{DEFAULT_COOKIE_NAME, DEFAULT_TTL_DAYS};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_ACCESS_DENIED_PATH: &str = "/access-denied";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid session config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,
    #[error("{field} must be an absolute path, got {value:?}")]
    RelativePath { field: &'static str, value: String },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie holding the bearer token.
    pub cookie_name: String,
    /// Retention used when a login stores a token.
    pub ttl_days: u32,
    pub poll_interval_ms: u64,
    /// Where unauthenticated visitors are sent.
    pub login_path: String,
    /// Where signed-in visitors without the admin role are sent.
    pub access_denied_path: String,
    pub admin_role: String,
    /// `console_log` level for browser builds.
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            ttl_days: DEFAULT_TTL_DAYS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            access_denied_path: DEFAULT_ACCESS_DENIED_PATH.to_owned(),
            admin_role: ADMIN_ROLE.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON or on values that fail
    /// [`validate`](Self::validate).
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.cookie_name.trim().is_empty() {
            return Err(ConfigError::Empty { field: "cookie_name" });
        }
        if self.admin_role.is_empty() {
            return Err(ConfigError::Empty { field: "admin_role" });
        }
        check_path("login_path", &self.login_path)?;
        check_path("access_denied_path", &self.access_denied_path)?;
        self.level_filter()?;
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parsed [`log_level`](Self::log_level).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] for names `log` does not know.
    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

fn check_path(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::RelativePath { field, value: value.to_owned() })
    }
}
