//! Login endpoint client.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SessionError;
use crate::engine::BoxFuture;

/// Body posted to the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_onboarded: bool,
}

/// Anything that can exchange credentials for a token.
pub trait LoginClient: Send + Sync {
    fn login<'a>(
        &'a self,
        request: &'a LoginRequest,
    ) -> BoxFuture<'a, Result<LoginResponse, SessionError>>;
}

/// Posts JSON credentials to `{base_url}/auth/login`.
#[derive(Debug, Clone)]
pub struct HttpLoginClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLoginClient {
    /// Client with a 30 second timeout.
    pub fn new(base_url: &str) -> Result<Self, SessionError> {
        Self::with_timeout(base_url, 30)
    }

    /// Client with a custom timeout.
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SessionError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/auth/login", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &LoginRequest) -> Result<LoginResponse, SessionError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| SessionError::Decode(format!("Failed to encode request: {}", e)))?;

        debug!(endpoint = %self.endpoint, email = %request.email, "Sending login request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SessionError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SessionError::Http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SessionError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| SessionError::Decode(e.to_string()))
    }
}

impl LoginClient for HttpLoginClient {
    fn login<'a>(
        &'a self,
        request: &'a LoginRequest,
    ) -> BoxFuture<'a, Result<LoginResponse, SessionError>> {
        Box::pin(self.post(request))
    }
}
