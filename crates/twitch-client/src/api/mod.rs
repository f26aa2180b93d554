//! Twitch Helix REST API client.
//!
//! Provides typed access to the Helix endpoints the alert daemon needs,
//! with Bearer token + Client-ID header injection on every request.

mod request;
mod streams;
mod users;

pub mod models;

pub use models::{HelixResponse, StreamInfo, TwitchUser};
pub use streams::MAX_IDS_PER_REQUEST;

use std::time::Duration;

use crate::{AccessToken, TwitchError};

pub const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Twitch Helix API client with automatic auth header injection.
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) base_url: String,
}

impl TwitchApiClient {
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            base_url: HELIX_BASE.to_string(),
        }
    }

    /// Build a client whose requests fail with a transport error after `timeout`.
    pub fn with_timeout(client_id: String, timeout: Duration) -> Result<Self, TwitchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            client_id,
            base_url: HELIX_BASE.to_string(),
        })
    }

    /// Point the client at a different Helix root (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
