//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Default base URL of the authentication backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default port for the registration page server.
pub const DEFAULT_PORT: u16 = 3000;

/// Idle time after which an abandoned page session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL the signup client posts to (no trailing slash).
    pub api_base_url: String,
    /// Port the page server listens on.
    pub port: u16,
    /// Timeout applied to each outbound signup request.
    pub request_timeout: Duration,
    /// Sessions untouched for this long are expired.
    pub session_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(10),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match lookup("WEIGHT_SIGNUP_API_BASE_URL") {
            Some(raw) if !raw.trim().is_empty() => normalize_base_url(&raw)?,
            _ => DEFAULT_API_BASE_URL.to_string(),
        };

        let port = match lookup("WEIGHT_SIGNUP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "WEIGHT_SIGNUP_PORT".to_string(),
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let request_timeout = match lookup("WEIGHT_SIGNUP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_secs("WEIGHT_SIGNUP_REQUEST_TIMEOUT_SECS", &raw)?,
            None => Duration::from_secs(10),
        };

        let session_ttl = match lookup("WEIGHT_SIGNUP_SESSION_TTL_SECS") {
            Some(raw) => parse_secs("WEIGHT_SIGNUP_SESSION_TTL_SECS", &raw)?,
            None => DEFAULT_SESSION_TTL,
        };
        if session_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "WEIGHT_SIGNUP_SESSION_TTL_SECS".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            port,
            request_timeout,
            session_ttl,
        })
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: "WEIGHT_SIGNUP_API_BASE_URL".to_string(),
            message: format!("expected an http(s) URL, got {trimmed:?}"),
        });
    }
    Ok(trimmed.to_string())
}
