//! Startup sequence shared by the daemon binary.

use std::time::Duration;

use twitch_client::auth::TwitchAuth;

use crate::config::{self, ChannelConfig, ConfigStore, DaemonConfig};
use crate::error::AlertError;
use crate::maintenance::{self, TokenCheck};

/// Steps 1-3: settings and credentials file (fatal on error).
pub fn init_foundation() -> Result<(DaemonConfig, ChannelConfig), AlertError> {
    config::load_dotenv();

    let daemon = DaemonConfig::from_env()?;
    tracing::info!(
        "Loading credentials file at {}",
        daemon.config_path.display()
    );
    let channels = ConfigStore::new(daemon.config_path.clone()).load()?;

    if channels.watch_list.is_empty() {
        tracing::warn!("Watch-list is empty; the daemon will poll without querying Twitch");
    }
    tracing::info!(
        channels = channels.watch_list.len(),
        poll_interval_secs = daemon.poll_interval.as_secs(),
        "Settings loaded"
    );
    Ok((daemon, channels))
}

/// Step 4: one-off token check. Logs guidance, never aborts startup.
/// Bounded by `timeout` so an unresponsive auth server cannot stall startup.
pub async fn check_credentials(channels: &ChannelConfig, timeout: Duration) -> TokenCheck {
    let auth = match TwitchAuth::with_timeout(channels.credentials.client_id.clone(), timeout) {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Could not build auth client, skipping token check: {e}");
            return TokenCheck::Unknown;
        }
    };
    maintenance::check_token(&auth, &channels.credentials.access_token).await
}
