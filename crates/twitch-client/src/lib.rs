//! Twitch integration client library.
//!
//! Provides the Helix REST calls used for live-status polling and channel
//! lookup, plus app access token handling.

pub mod api;
pub mod auth;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bearer token sent with every Helix request.
///
/// `Debug` never prints the secret; use [`AccessToken::masked`] for logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First four characters followed by the total length, e.g. `abcd… (30 chars)`.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}… ({} chars)", self.0.chars().count())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.masked())
    }
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),
}

impl TwitchError {
    /// True when Twitch rejected the credentials (expired or revoked token).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ApiError { status: 401, .. })
    }

    /// Short label used in diagnostics: `transport`, `status`, `body` or `request`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "transport",
            Self::ApiError { .. } => "status",
            Self::Json(_) => "body",
            Self::InvalidHeader(_) | Self::TokenRequestFailed(_) => "request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_masked() {
        let token = AccessToken::new("abcdefghijklmnop");
        let printed = format!("{token:?}");
        assert!(printed.contains("abcd"));
        assert!(!printed.contains("efgh"));
        assert!(printed.contains("16 chars"));
    }

    #[test]
    fn unauthorized_is_detected_from_status() {
        let err = TwitchError::ApiError {
            status: 401,
            message: "Invalid OAuth token".into(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.kind(), "status");

        let err = TwitchError::ApiError {
            status: 500,
            message: String::new(),
        };
        assert!(!err.is_unauthorized());
    }
}
