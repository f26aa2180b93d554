//! Maintenance operations on the credentials file: adding channels by login,
//! bulk import from names or channel URLs, and access token regeneration.
//!
//! These never run inside the poll loop; the daemon picks up changes on its
//! next start.

use std::path::Path;

use anyhow::Context;
use twitch_client::AccessToken;
use twitch_client::api::{MAX_IDS_PER_REQUEST, TwitchApiClient};
use twitch_client::auth::{AppToken, TwitchAuth};

use crate::channel::ChannelId;
use crate::config::ConfigStore;

/// Result of [`add_channel_by_login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(ChannelId),
    AlreadyWatched(ChannelId),
    NotFound,
}

/// Summary of an [`import_channels`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: Vec<ChannelId>,
    pub already_watched: Vec<ChannelId>,
    pub not_found: Vec<String>,
}

/// Resolve `login` to a channel id and append it to the watch-list.
pub async fn add_channel_by_login(
    store: &ConfigStore,
    client: &TwitchApiClient,
    login: &str,
) -> anyhow::Result<AddOutcome> {
    let config = store.load()?;
    let Some(user) = client
        .get_user_by_login(&config.credentials.access_token, login.trim())
        .await
        .with_context(|| format!("failed to look up {login}"))?
    else {
        tracing::info!(login, "Channel not found");
        return Ok(AddOutcome::NotFound);
    };

    let id = ChannelId::new(user.id);
    if store.add_channels(std::slice::from_ref(&id))?.is_empty() {
        tracing::info!(login, channel = %id, "Channel already watched");
        return Ok(AddOutcome::AlreadyWatched(id));
    }
    tracing::info!(login, channel = %id, "Added channel to watch-list");
    Ok(AddOutcome::Added(id))
}

/// Extract channel logins from lines holding either a bare name or a channel
/// URL such as `https://www.twitch.tv/somename`. Blank lines are skipped.
pub fn parse_channel_names(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        let line = line.split(['?', '#']).next().unwrap_or_default();
        let Some(name) = line.trim_end_matches('/').rsplit('/').next() else {
            continue;
        };
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Resolve every name in `input` and merge the ids into the watch-list.
/// Existing ids are kept; nothing is overwritten.
pub async fn import_channels(
    store: &ConfigStore,
    client: &TwitchApiClient,
    input: &str,
) -> anyhow::Result<ImportReport> {
    let config = store.load()?;
    let names = parse_channel_names(input);
    let mut report = ImportReport::default();
    let mut resolved = Vec::new();

    for chunk in names.chunks(MAX_IDS_PER_REQUEST) {
        let users = client
            .get_users_by_logins(&config.credentials.access_token, chunk)
            .await
            .context("failed to resolve channel names")?;
        for name in chunk {
            match users.iter().find(|u| u.login.eq_ignore_ascii_case(name)) {
                Some(user) => resolved.push(ChannelId::new(user.id.clone())),
                None => report.not_found.push(name.clone()),
            }
        }
    }

    report.added = store.add_channels(&resolved)?;
    report.already_watched = resolved
        .into_iter()
        .filter(|id| !report.added.contains(id))
        .collect();

    tracing::info!(
        added = report.added.len(),
        already_watched = report.already_watched.len(),
        not_found = report.not_found.len(),
        "Import done"
    );
    Ok(report)
}

/// Read a one-line secret (client secret) from disk.
pub fn read_secret_file(path: &Path) -> anyhow::Result<String> {
    let secret = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?
        .trim()
        .to_string();
    if secret.is_empty() {
        anyhow::bail!("{} is empty", path.display());
    }
    Ok(secret)
}

/// Obtain a new app access token and store it in the credentials file.
pub async fn regenerate_access_token(
    store: &ConfigStore,
    auth: &TwitchAuth,
    client_secret: &str,
) -> anyhow::Result<AppToken> {
    let token = auth
        .request_app_token(client_secret)
        .await
        .context("token regeneration failed")?;
    store.set_access_token(&token.access_token)?;
    tracing::info!(
        token = %token.access_token.masked(),
        expires_at = token.expires_at,
        "Access token regenerated"
    );
    Ok(token)
}

/// What Twitch said about the configured token at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Valid { expires_in: i64 },
    Rejected,
    Unknown,
}

/// Validate the token once and log guidance. Never fatal.
pub async fn check_token(auth: &TwitchAuth, token: &AccessToken) -> TokenCheck {
    match auth.validate_token(token).await {
        Ok(Some(v)) => {
            tracing::info!(expires_in = v.expires_in, "Access token is valid");
            TokenCheck::Valid {
                expires_in: v.expires_in,
            }
        }
        Ok(None) => {
            tracing::warn!(
                token = %token.masked(),
                "Twitch rejected the access token; regenerate it and update the credentials file"
            );
            TokenCheck::Rejected
        }
        Err(e) => {
            tracing::warn!("Could not validate access token: {e}");
            TokenCheck::Unknown
        }
    }
}
