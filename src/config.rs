// src/config.rs
use std::time::Duration;

use thiserror::Error;

use crate::services::history::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_REPORT_API_BASE_URL: &str = "https://fastapi-app-1057230376331.us-central1.run.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub report_api_base_url: String,
    /// `None` leaves report calls unbounded.
    pub request_timeout: Option<Duration>,
    pub bind_addr: String,
    pub history_capacity: usize,
    pub session_ttl: Duration,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_api_base_url: DEFAULT_REPORT_API_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs = parse_or(&lookup, "REPORT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let history_capacity = parse_or(&lookup, "HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?;
        let ttl_secs = parse_or(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

        if history_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "HISTORY_CAPACITY",
                value: "0".to_string(),
            });
        }
        if ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            report_api_base_url: lookup("REPORT_API_BASE_URL").unwrap_or(defaults.report_api_base_url),
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            history_capacity,
            session_ttl: Duration::from_secs(ttl_secs),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
