//! Notification type definitions.

use crate::channel::ChannelId;
use crate::status::StreamStatus;

/// One newly-live channel as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveAlert {
    pub channel_id: ChannelId,
    pub login: String,
    pub display_name: String,
    pub title: String,
    pub viewer_count: u64,
    pub watch_url: String,
}

impl From<&StreamStatus> for LiveAlert {
    fn from(status: &StreamStatus) -> Self {
        Self {
            channel_id: status.channel_id.clone(),
            login: status.login.clone(),
            display_name: status.display_name.clone(),
            title: status.title.clone(),
            viewer_count: status.viewer_count,
            watch_url: status.watch_url(),
        }
    }
}

/// Summary line and body of the single aggregated toast for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertText {
    pub summary: String,
    pub body: String,
}

impl AlertText {
    pub fn for_batch(alerts: &[LiveAlert]) -> Self {
        let names = alerts
            .iter()
            .map(|a| a.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let body = alerts
            .iter()
            .map(|a| {
                format!(
                    "{}: {} ({} {})",
                    a.display_name,
                    a.title,
                    a.viewer_count,
                    if a.viewer_count == 1 { "viewer" } else { "viewers" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            summary: format!("Live now: {names}"),
            body,
        }
    }
}
