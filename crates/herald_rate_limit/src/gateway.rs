//! HTTP client for an RPC gateway in front of the messaging API.
//!
//! The gateway accepts `POST {base_url}/call` with a body of
//! `{"method": ..., "params": ...}`. A successful call answers with the raw
//! result as JSON. A failed call answers with a non-success status and
//! `{"error_message": ..., "error_code": ...}`.

use crate::{RemoteApi, classify_remote_error};
use derive_getters::Getters;
use herald_error::{HttpError, UpstreamError, UpstreamErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, instrument};

/// Connection settings for the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://localhost:9000`
    base_url: String,
    /// Bearer token sent with every call
    #[serde(default)]
    token: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl GatewayConfig {
    /// Settings for `base_url` with no token and the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Send `token` as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }
}

#[derive(Serialize)]
struct CallRequest<'a> {
    method: &'a str,
    params: &'a JsonValue,
}

#[derive(Deserialize)]
struct CallFailure {
    error_message: String,
    #[serde(default)]
    error_code: Option<i64>,
}

/// [`RemoteApi`] implementation backed by the HTTP gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl GatewayClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] if the underlying HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, HttpError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build gateway client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/call", config.base_url.trim_end_matches('/')),
            token: config.token,
        })
    }
}

#[async_trait::async_trait]
impl RemoteApi for GatewayClient {
    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    async fn call(&self, method: &str, params: &JsonValue) -> Result<JsonValue, UpstreamError> {
        let mut request = self.http.post(&self.endpoint).json(&CallRequest { method, params });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<JsonValue>().await.map_err(|e| {
                UpstreamError::new(UpstreamErrorKind::MalformedResponse(format!(
                    "{} returned invalid JSON: {}",
                    method, e
                )))
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Transport(e.to_string())))?;

        match serde_json::from_str::<CallFailure>(&body) {
            Ok(failure) => {
                debug!(
                    status = status.as_u16(),
                    error_code = ?failure.error_code,
                    error_message = %failure.error_message,
                    "Gateway reported call failure"
                );
                Err(classify_remote_error(failure.error_message))
            }
            Err(_) => Err(UpstreamError::new(UpstreamErrorKind::Remote(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )))),
        }
    }
}
