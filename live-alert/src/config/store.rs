//! Credentials file: watched channel ids plus Twitch API credentials.
//!
//! The file is shared with the maintenance helpers, so unknown keys are kept
//! intact when it is rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use twitch_client::AccessToken;

use crate::channel::{ChannelId, WatchList};
use crate::error::AlertError;

/// Client id and bearer token forwarded as request headers.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub access_token: AccessToken,
}

/// Everything the daemon reads from the credentials file.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub watch_list: WatchList,
    pub credentials: Credentials,
}

/// Ids are written as strings but older files hold bare numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawChannelId {
    Text(String),
    Number(u64),
}

impl RawChannelId {
    fn normalize(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    ids: Vec<RawChannelId>,
    #[serde(default)]
    twitch_client_id: String,
    #[serde(default)]
    twitch_access_token: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Reads and rewrites the credentials file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the watch-list and credentials. Any problem is `ConfigLoadFailed`.
    pub fn load(&self) -> Result<ChannelConfig, AlertError> {
        let file = self.read_file()?;

        let mut ids = Vec::with_capacity(file.ids.len());
        for raw in &file.ids {
            let id = raw.normalize();
            if id.is_empty() {
                return Err(self.failure("channel ids must not be empty"));
            }
            ids.push(ChannelId::new(id));
        }

        let client_id = file.twitch_client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(self.failure("twitchClientId is missing"));
        }
        let access_token = AccessToken::new(file.twitch_access_token.trim());
        if access_token.is_empty() {
            return Err(self.failure("twitchAccessToken is missing"));
        }

        Ok(ChannelConfig {
            watch_list: WatchList::new(ids),
            credentials: Credentials {
                client_id,
                access_token,
            },
        })
    }

    /// Append ids to the file's watch-list, skipping ones already present.
    /// Returns the ids that were actually added.
    pub fn add_channels(&self, new_ids: &[ChannelId]) -> Result<Vec<ChannelId>, AlertError> {
        let mut file = self.read_file()?;
        let mut existing: WatchList = file
            .ids
            .iter()
            .map(|raw| ChannelId::new(raw.normalize()))
            .collect();

        let mut added = Vec::new();
        for id in new_ids {
            if existing.insert(id.clone()) {
                file.ids.push(RawChannelId::Text(id.as_str().to_string()));
                added.push(id.clone());
            }
        }

        if !added.is_empty() {
            self.write_file(&file)?;
        }
        Ok(added)
    }

    /// Replace the stored access token.
    pub fn set_access_token(&self, token: &AccessToken) -> Result<(), AlertError> {
        let mut file = self.read_file()?;
        file.twitch_access_token = token.secret().to_string();
        self.write_file(&file)
    }

    fn read_file(&self) -> Result<ConfigFile, AlertError> {
        let data = fs::read_to_string(&self.path).map_err(|e| self.failure(e))?;
        serde_json::from_str(&data).map_err(|e| self.failure(e))
    }

    fn write_file(&self, file: &ConfigFile) -> Result<(), AlertError> {
        let data = serde_json::to_string_pretty(file).map_err(|e| self.failure(e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|e| self.failure(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.failure(e))?;
        tracing::info!(path = %self.path.display(), "Credentials file updated");
        Ok(())
    }

    fn failure(&self, reason: impl ToString) -> AlertError {
        AlertError::ConfigLoadFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
