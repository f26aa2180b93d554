//! Desktop notification for newly-live channels.
//!
//! A batch of events becomes one aggregated toast. When a chooser and a
//! launcher are configured, the batch is also offered as a pick-list whose
//! selection starts a player. The chooser runs detached and never feeds back
//! into the tracker.

pub mod desktop;
pub mod headless;
pub mod launcher;
pub mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;

use crate::channel::ChannelId;
use crate::config::{DaemonConfig, NotifierKind};
use crate::error::AlertError;

pub use desktop::DesktopNotifier;
pub use headless::LogNotifier;
pub use launcher::CommandLauncher;
pub use types::{AlertText, LiveAlert};

/// A user-visible notification backend.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Show one toast. May block briefly; called off the async executor.
    fn notify(&self, text: &AlertText) -> Result<(), AlertError>;

    fn supports_chooser(&self) -> bool {
        false
    }

    /// Offer `candidates` and block until one is picked or the prompt closes.
    fn present_chooser(&self, _candidates: &[LiveAlert]) -> Result<Option<ChannelId>, AlertError> {
        Ok(None)
    }
}

/// Starts an external player for a chosen channel.
pub trait Launcher: Send + Sync {
    fn launch(&self, alert: &LiveAlert) -> Result<(), AlertError>;
}

/// Routes newly-live batches to the configured notifier and launcher.
///
/// At most one chooser is open at a time; clones share that slot.
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    launcher: Option<Arc<dyn Launcher>>,
    chooser_enabled: bool,
    chooser_open: Arc<AtomicBool>,
}

/// Marks the chooser slot busy until dropped, including on panic.
struct ChooserSlot(Arc<AtomicBool>);

impl ChooserSlot {
    fn claim(open: &Arc<AtomicBool>) -> Option<Self> {
        if open.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Self(Arc::clone(open)))
    }
}

impl Drop for ChooserSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Dispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        launcher: Option<Arc<dyn Launcher>>,
        chooser_enabled: bool,
    ) -> Self {
        Self {
            notifier,
            launcher,
            chooser_enabled,
            chooser_open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pick the backend for this platform and settings. Called once at startup.
    pub fn from_config(config: &DaemonConfig) -> Self {
        let notifier: Arc<dyn Notifier> = match config.notifier {
            NotifierKind::Desktop => Arc::new(DesktopNotifier::new(config.notification_timeout)),
            NotifierKind::Log => Arc::new(LogNotifier),
        };
        let launcher = config
            .player_command
            .as_deref()
            .and_then(CommandLauncher::parse)
            .map(|l| Arc::new(l) as Arc<dyn Launcher>);

        if config.chooser_enabled && launcher.is_none() {
            tracing::warn!("CHOOSER_ENABLED is set but PLAYER_COMMAND is empty, chooser disabled");
        }
        if config.chooser_enabled && !notifier.supports_chooser() {
            tracing::warn!(
                notifier = notifier.name(),
                "Notifier cannot present a chooser, chooser disabled"
            );
        }

        tracing::info!(
            notifier = notifier.name(),
            launcher = launcher.is_some(),
            chooser = config.chooser_enabled,
            "Notification dispatcher ready"
        );
        Self::new(notifier, launcher, config.chooser_enabled)
    }

    fn chooser_active(&self) -> bool {
        self.chooser_enabled && self.launcher.is_some() && self.notifier.supports_chooser()
    }

    /// Show the aggregated toast for `alerts`.
    ///
    /// Returns the detached chooser task when one was started. No chooser is
    /// started while a previous one is still open. Failures are logged here
    /// and never returned to the caller.
    pub async fn dispatch(&self, alerts: Vec<LiveAlert>) -> Option<JoinHandle<()>> {
        if alerts.is_empty() {
            return None;
        }

        let text = AlertText::for_batch(&alerts);
        tracing::info!(summary = %text.summary, "Sending live notification");

        let notifier = Arc::clone(&self.notifier);
        let shown = tokio::task::spawn_blocking(move || notifier.notify(&text)).await;
        match shown {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(notifier = self.notifier.name(), "{e}"),
            Err(e) => tracing::warn!("Notification task panicked: {e}"),
        }

        if !self.chooser_active() {
            return None;
        }
        let launcher = self.launcher.clone()?;
        let Some(slot) = ChooserSlot::claim(&self.chooser_open) else {
            tracing::debug!("Previous chooser still open, skipping chooser for this batch");
            return None;
        };
        let notifier = Arc::clone(&self.notifier);
        Some(tokio::task::spawn_blocking(move || {
            let _slot = slot;
            run_chooser(notifier.as_ref(), launcher.as_ref(), &alerts)
        }))
    }
}

fn run_chooser(notifier: &dyn Notifier, launcher: &dyn Launcher, alerts: &[LiveAlert]) {
    let selected = match notifier.present_chooser(alerts) {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::debug!("Chooser closed without a selection");
            return;
        }
        Err(e) => {
            tracing::warn!("{e}");
            return;
        }
    };

    let Some(alert) = alerts.iter().find(|a| a.channel_id == selected) else {
        tracing::warn!(channel = %selected, "Chooser returned an unknown channel");
        return;
    };

    match launcher.launch(alert) {
        Ok(()) => tracing::info!(channel = %alert.channel_id, "Player launched"),
        Err(e) => tracing::warn!(channel = %alert.channel_id, "{e}"),
    }
}
