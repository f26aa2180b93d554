//! Daemon error taxonomy.

use std::path::PathBuf;

use twitch_client::TwitchError;

/// Errors raised by the alert daemon.
///
/// `ConfigLoadFailed` and `InvalidSetting` abort startup; the other variants
/// are caught at the tick boundary and logged.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoadFailed { path: PathBuf, reason: String },

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("live status query failed ({}): {}", .0.kind(), .0)]
    QueryFailed(#[source] TwitchError),

    #[error("notification dispatch failed: {0}")]
    DispatchFailed(String),
}

impl AlertError {
    /// True when the failure was Twitch rejecting the access token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::QueryFailed(e) if e.is_unauthorized())
    }
}

impl From<TwitchError> for AlertError {
    fn from(e: TwitchError) -> Self {
        Self::QueryFailed(e)
    }
}
