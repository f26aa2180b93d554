//! Runtime daemon configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use twitch_client::api::HELIX_BASE;

use super::validation::validate_setting;
use crate::error::AlertError;

/// Which notification backend to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifierKind {
    #[default]
    Desktop,
    Log,
}

impl NotifierKind {
    /// Expects a value already accepted by `validate_setting`.
    pub fn from_str_setting(s: &str) -> Self {
        match s {
            "log" => Self::Log,
            _ => Self::Desktop,
        }
    }
}

/// Runtime configuration populated from environment variables.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub config_path: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub notifier: NotifierKind,
    pub chooser_enabled: bool,
    pub player_command: Option<String>,
    pub notification_timeout: Duration,
    pub helix_base_url: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            config_path: data_dir().join("config.json"),
            poll_interval: Duration::from_secs(600),
            request_timeout: Duration::from_secs(15),
            notifier: NotifierKind::Desktop,
            chooser_enabled: false,
            player_command: None,
            notification_timeout: Duration::from_millis(3000),
            helix_base_url: HELIX_BASE.to_string(),
        }
    }
}

impl DaemonConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, AlertError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset or empty keys keep their
    /// defaults; set keys must pass validation.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AlertError> {
        let g = |key: &'static str| -> Result<Option<String>, AlertError> {
            let Some(value) = lookup(key).map(|v| v.trim().to_string()) else {
                return Ok(None);
            };
            if value.is_empty() {
                return Ok(None);
            }
            validate_setting(key, &value)
                .map_err(|reason| AlertError::InvalidSetting { key, reason })?;
            Ok(Some(value))
        };

        let mut config = Self::default();

        if let Some(path) = g("TWITCH_LIVE_ALERT_CONFIG")? {
            config.config_path = PathBuf::from(path);
        }
        if let Some(v) = g("POLL_INTERVAL_SECS")? {
            config.poll_interval = Duration::from_secs(parse_u64("POLL_INTERVAL_SECS", &v)?);
        }
        if let Some(v) = g("REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(parse_u64("REQUEST_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = g("NOTIFICATION_TIMEOUT_MS")? {
            config.notification_timeout =
                Duration::from_millis(parse_u64("NOTIFICATION_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = g("NOTIFIER")? {
            config.notifier = NotifierKind::from_str_setting(&v);
        }
        if let Some(v) = g("CHOOSER_ENABLED")? {
            config.chooser_enabled = v == "true";
        }
        config.player_command = g("PLAYER_COMMAND")?;
        if let Some(v) = g("HELIX_BASE_URL")? {
            config.helix_base_url = v.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

/// Determine the data directory for the daemon.
/// Priority: TWITCH_LIVE_ALERT_DIR env var > ~/.twitch-live-alert
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TWITCH_LIVE_ALERT_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".twitch-live-alert")
}

fn parse_u64(key: &'static str, s: &str) -> Result<u64, AlertError> {
    s.parse().map_err(|_| AlertError::InvalidSetting {
        key,
        reason: "must be an integer".into(),
    })
}
