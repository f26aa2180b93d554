//! App access token management for Twitch authentication.
//!
//! Handles the client-credentials grant used to regenerate the daemon's
//! bearer token, and token validation.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::{AccessToken, TwitchError};

const OAUTH_BASE: &str = "https://id.twitch.tv/oauth2";

/// Twitch OAuth token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// An app access token and its absolute expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct AppToken {
    pub access_token: AccessToken,
    pub expires_at: i64,
}

/// Result of `GET /oauth2/validate` for a token Twitch still accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenValidation {
    pub client_id: String,
    #[serde(default)]
    pub expires_in: i64,
}

/// Issues and validates Twitch app access tokens.
pub struct TwitchAuth {
    client_id: String,
    oauth_base: String,
    http: reqwest::Client,
}

impl TwitchAuth {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            oauth_base: OAUTH_BASE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Like [`TwitchAuth::new`], but every request fails with a transport
    /// error once `timeout` elapses.
    pub fn with_timeout(client_id: String, timeout: Duration) -> Result<Self, TwitchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client_id,
            oauth_base: OAUTH_BASE.to_string(),
            http,
        })
    }

    /// Point the manager at a different OAuth root (mock servers).
    pub fn with_oauth_base(mut self, base: impl Into<String>) -> Self {
        self.oauth_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Request a fresh app access token with the client-credentials grant.
    pub async fn request_app_token(&self, client_secret: &str) -> Result<AppToken, TwitchError> {
        tracing::info!("Requesting new Twitch app access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(format!("{}/token", self.oauth_base))
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(TwitchError::TokenRequestFailed(describe_error(
                status.as_u16(),
                &body,
            )));
        }

        let token_resp: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            TwitchError::TokenRequestFailed(format!("failed to parse response: {e}"))
        })?;

        Ok(AppToken {
            access_token: AccessToken::new(token_resp.access_token),
            expires_at: Utc::now().timestamp() + token_resp.expires_in,
        })
    }

    /// Ask Twitch whether `token` is still valid.
    ///
    /// Returns `Ok(None)` when Twitch rejects the token (401), so callers can
    /// tell "expired" apart from "could not reach Twitch".
    pub async fn validate_token(
        &self,
        token: &AccessToken,
    ) -> Result<Option<TokenValidation>, TwitchError> {
        let resp = self
            .http
            .get(format!("{}/validate", self.oauth_base))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("OAuth {}", token.secret()),
            )
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }
}

fn describe_error(status: u16, body: &str) -> String {
    let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
        status: Some(status),
        message: Some(body.to_string()),
        error: None,
        error_description: None,
    });
    let reason = err
        .message
        .or(err.error_description)
        .or(err.error)
        .unwrap_or_default();
    format!("{}: {reason}", err.status.unwrap_or(status))
}
