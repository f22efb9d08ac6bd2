//! Configuration loading and representation.

use std::time::Duration;

use thiserror::Error;

/// Delay (milliseconds) before the access-denied screen navigates home.
pub const DENIAL_REDIRECT_ENV: &str = "STOCKGATE_DENIAL_REDIRECT_MS";

/// Log directive used when `RUST_LOG` is not set.
pub const LOG_ENV: &str = "STOCKGATE_LOG";

const DEFAULT_DENIAL_REDIRECT: Duration = Duration::from_millis(3_000);
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected a number of milliseconds, got '{value}'")]
    InvalidDuration { key: &'static str, value: String },

    #[error("{key} must not be blank")]
    Blank { key: &'static str },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// How long the denial explanation stays up before redirecting home.
    pub denial_redirect_delay: Duration,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            denial_redirect_delay: DEFAULT_DENIAL_REDIRECT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment; unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, query string, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DENIAL_REDIRECT_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidDuration {
                key: DENIAL_REDIRECT_ENV,
                value: raw.clone(),
            })?;
            config.denial_redirect_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(LOG_ENV) {
            let filter = raw.trim();
            if filter.is_empty() {
                return Err(ConfigError::Blank { key: LOG_ENV });
            }
            config.log_filter = filter.to_string();
        }

        Ok(config)
    }
}
