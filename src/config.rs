//! Credential and endpoint configuration for the remote API.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_VAR: &str = "HUNTER_API_KEY";
pub const BASE_URL_VAR: &str = "HUNTER_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "HUNTER_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.hunter.io/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by every call made through a [`HunterClient`](crate::HunterClient).
///
/// The API key is redacted from the `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `HUNTER_API_KEY` (required), `HUNTER_API_BASE_URL` and
    /// `HUNTER_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] against an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get_required_var(&lookup, API_KEY_VAR)?;
        let mut config = Self::new(api_key);

        if let Some(base_url) = get_optional_var(&lookup, BASE_URL_VAR) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = get_optional_var(&lookup, TIMEOUT_VAR) {
            let secs: u64 = raw.parse().map_err(|source| ConfigError::InvalidTimeout {
                value: raw.clone(),
                source,
            })?;
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout);
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn get_required_var<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or(ConfigError::MissingVar { key })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyVar { key });
    }
    Ok(trimmed.to_string())
}

fn get_optional_var<F>(lookup: &F, key: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Errors emitted while loading [`ApiConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{key}`")]
    MissingVar { key: &'static str },
    #[error("environment variable `{key}` is empty")]
    EmptyVar { key: &'static str },
    #[error("invalid timeout `{value}` in `HUNTER_TIMEOUT_SECS`: {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("timeout must be at least one second")]
    ZeroTimeout,
}
