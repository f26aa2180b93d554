//! Native desktop toasts via notify-rust.
//!
//! The chooser relies on notification actions, which only freedesktop
//! notification servers report back; other targets show the toast only.
//! The chooser expiry is a hint: servers that ignore it keep the prompt
//! open until the user acts on it or dismisses it.

use std::time::Duration;

use notify_rust::{Notification, Timeout};

use super::{AlertText, Notifier};
use crate::error::AlertError;
#[cfg(all(unix, not(target_os = "macos")))]
use {super::LiveAlert, crate::channel::ChannelId};

const APP_NAME: &str = "TwitchLiveAlert";
#[cfg(all(unix, not(target_os = "macos")))]
const CHOOSER_TIMEOUT: Duration = Duration::from_secs(60);

pub struct DesktopNotifier {
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

fn timeout_of(duration: Duration) -> Timeout {
    Timeout::Milliseconds(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX))
}

fn dispatch_failed(e: notify_rust::error::Error) -> AlertError {
    AlertError::DispatchFailed(format!("desktop notification: {e}"))
}

impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn notify(&self, text: &AlertText) -> Result<(), AlertError> {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&text.summary)
            .body(&text.body)
            .timeout(timeout_of(self.timeout));
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(notify_rust::Urgency::Low);

        notification.show().map_err(dispatch_failed)?;
        Ok(())
    }

    fn supports_chooser(&self) -> bool {
        cfg!(all(unix, not(target_os = "macos")))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn present_chooser(&self, candidates: &[LiveAlert]) -> Result<Option<ChannelId>, AlertError> {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary("Watch a live channel?")
            .body("Pick a channel to open it in the player.")
            .timeout(timeout_of(CHOOSER_TIMEOUT));
        for alert in candidates {
            notification.action(alert.channel_id.as_str(), &alert.display_name);
        }

        let handle = notification.show().map_err(dispatch_failed)?;
        let mut selected = None;
        handle.wait_for_action(|action| {
            if candidates.iter().any(|a| a.channel_id.as_str() == action) {
                selected = Some(ChannelId::new(action));
            }
        });
        Ok(selected)
    }
}
