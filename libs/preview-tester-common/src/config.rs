// Service configuration for the execute-tests step
use crate::error::ConfigError;
use std::time::Duration;

pub const API_KEY_VAR: &str = "BROWSER_USE_API_KEY";
pub const BASE_URL_VAR: &str = "BROWSER_USE_BASE_URL";
pub const POLL_INTERVAL_VAR: &str = "POLL_INTERVAL_MS";
pub const MAX_POLL_TIME_VAR: &str = "MAX_POLL_TIME_MS";
pub const REQUEST_TIMEOUT_VAR: &str = "REQUEST_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "https://api.browser-use.com/api/v2";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_MAX_POLL_TIME_MS: u64 = 5 * 60 * 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub poll_interval: Duration,
    pub max_poll_time: Duration,
    pub request_timeout: Duration,
}

impl ServiceConfig {
    /// Config with default timings for the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_time: Duration::from_millis(DEFAULT_MAX_POLL_TIME_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = millis(&lookup, POLL_INTERVAL_VAR)? {
            config.poll_interval = ms;
        }
        if let Some(ms) = millis(&lookup, MAX_POLL_TIME_VAR)? {
            config.max_poll_time = ms;
        }
        if let Some(ms) = millis(&lookup, REQUEST_TIMEOUT_VAR)? {
            config.request_timeout = ms;
        }

        Ok(config)
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_time", &self.max_poll_time)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Positive millisecond duration; zero would turn the poll wait into a busy loop
fn millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Some(Duration::from_millis(ms))),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
    }
}
