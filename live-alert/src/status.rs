//! Status query client: one batched Helix call per tick.

use async_trait::async_trait;
use twitch_client::api::{StreamInfo, TwitchApiClient};

use crate::channel::{ChannelId, WatchList};
use crate::config::{Credentials, DaemonConfig};
use crate::error::AlertError;

/// A channel reported live by the upstream API. Lives for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStatus {
    pub channel_id: ChannelId,
    pub login: String,
    pub display_name: String,
    pub title: String,
    pub game_name: String,
    pub viewer_count: u64,
    pub started_at: Option<String>,
}

impl StreamStatus {
    pub fn watch_url(&self) -> String {
        format!("https://www.twitch.tv/{}", self.login)
    }
}

impl From<StreamInfo> for StreamStatus {
    fn from(info: StreamInfo) -> Self {
        let display_name = if info.user_name.is_empty() {
            info.user_login.clone()
        } else {
            info.user_name
        };
        Self {
            channel_id: ChannelId::new(info.user_id),
            login: info.user_login,
            display_name,
            title: info.title,
            game_name: info.game_name,
            viewer_count: info.viewer_count,
            started_at: info.started_at,
        }
    }
}

/// Returns the subset of the watch-list that is currently live.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_live(&self, watch_list: &WatchList) -> Result<Vec<StreamStatus>, AlertError>;
}

/// [`StatusSource`] backed by the Twitch Helix `/streams` endpoint.
pub struct TwitchStatusSource {
    client: TwitchApiClient,
    credentials: Credentials,
}

impl TwitchStatusSource {
    pub fn new(client: TwitchApiClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Build the Helix client from daemon settings (timeout, base URL).
    pub fn from_config(config: &DaemonConfig, credentials: Credentials) -> Result<Self, AlertError> {
        let client =
            TwitchApiClient::with_timeout(credentials.client_id.clone(), config.request_timeout)?
                .with_base_url(config.helix_base_url.clone());
        Ok(Self::new(client, credentials))
    }
}

#[async_trait]
impl StatusSource for TwitchStatusSource {
    async fn fetch_live(&self, watch_list: &WatchList) -> Result<Vec<StreamStatus>, AlertError> {
        let ids = watch_list.as_strings();
        tracing::debug!(
            channels = ids.len(),
            token = %self.credentials.access_token.masked(),
            "Querying live status"
        );

        let streams = self
            .client
            .get_streams_by_user_ids(&self.credentials.access_token, &ids)
            .await
            .map_err(AlertError::QueryFailed)?;

        Ok(streams.into_iter().map(StreamStatus::from).collect())
    }
}
