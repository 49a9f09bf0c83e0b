//! Client for the authentication backend's signup endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{ApiError, ConfigError};
use crate::signup::SignupRequest;

/// Path of the signup endpoint, relative to the API base URL.
pub const SIGNUP_PATH: &str = "/auth/signup";

/// Anything that can register a new account.
///
/// The page server only needs this seam; tests plug in a stub.
#[async_trait]
pub trait SignupApi: Send + Sync {
    /// Register the account. The response body is returned as-is; the form
    /// does not use it beyond logging.
    async fn signup(&self, request: &SignupRequest) -> Result<serde_json::Value, ApiError>;
}

/// reqwest-backed signup client.
///
/// Keeps a cookie store so that credentials set by the backend travel with
/// later requests.
#[derive(Debug, Clone)]
pub struct HttpSignupClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSignupClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    pub fn signup_url(&self) -> String {
        format!("{}{}", self.base_url, SIGNUP_PATH)
    }
}

#[async_trait]
impl SignupApi for HttpSignupClient {
    async fn signup(&self, request: &SignupRequest) -> Result<serde_json::Value, ApiError> {
        let url = self.signup_url();
        debug!(url = %url, "Posting signup request");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Signup rejected by backend");
            return Err(ApiError::UnexpectedStatus {
                url,
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| ApiError::InvalidResponse {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        info!(url = %url, status = status.as_u16(), "Signup accepted");

        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse {
            url,
            reason: e.to_string(),
        })
    }
}
