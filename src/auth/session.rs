//! Authenticated session against the LLDAP admin API.

use crate::cancel::CancellationToken;
use crate::error::{AppError, AuthError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

/// Path of the username/password login endpoint.
const LOGIN_PATH: &str = "/auth/simple/login";

/// HTTP request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// HTTP connection timeout.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials sent to the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Token pair returned by the login endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    refresh_token: String,
}

/// HTTP client bound to one LLDAP server, plus the bearer token once logged in.
pub struct Session {
    endpoint: String,
    http_client: reqwest::Client,
    token: Option<Zeroizing<String>>,
    /// Held only so it is wiped on drop; refresh is not implemented.
    #[allow(dead_code)]
    refresh_token: Option<Zeroizing<String>>,
}

impl Session {
    /// Create an unauthenticated session for `endpoint`.
    pub fn new(endpoint: &str) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http_client,
            token: None,
            refresh_token: None,
        })
    }

    /// Create a session that reuses an already issued bearer token.
    pub fn with_token(endpoint: &str, token: &str) -> Result<Self, AppError> {
        let mut session = Self::new(endpoint)?;
        session.token = Some(Zeroizing::new(token.to_string()));
        Ok(session)
    }

    /// Create a session and log in with the given credentials.
    pub async fn login(
        endpoint: &str,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<Self, AppError> {
        let mut session = Self::new(endpoint)?;
        session.authenticate(username, password, cancel).await?;
        Ok(session)
    }

    /// Exchange a username and password for a bearer token.
    ///
    /// The token is stored on the session and returned. Nothing is stored on
    /// failure. The request is abandoned as soon as `cancel` fires.
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<&str, AuthError> {
        info!("Requesting auth token for user {}", username);

        let login = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Login cancelled");
                return Err(AuthError::Cancelled);
            }
            result = self.request_token(username, password) => result?,
        };

        debug!("Login succeeded, storing token pair");
        self.refresh_token = Some(Zeroizing::new(login.refresh_token));
        let token = self.token.insert(Zeroizing::new(login.token));

        info!("Authenticated as {}", username);
        Ok(token.as_str())
    }

    async fn request_token(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let url = format!("{}{}", self.endpoint, LOGIN_PATH);

        let response = self
            .http_client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Login failed: HTTP {} - {}", status, body);
            return Err(AuthError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Base URL of the server, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Bearer token, if the session is authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(String::as_str)
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}
