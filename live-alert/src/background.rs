//! Background poll loop: query, diff, notify, sleep, until cancelled.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::AlertError;
use crate::notification::{Dispatcher, LiveAlert};
use crate::status::StatusSource;
use crate::tracker::LivenessTracker;

/// Consecutive failures between repeated credential reminders.
const CREDENTIAL_HINT_EVERY: u32 = 3;

const CREDENTIAL_HINT: &str =
    "Twitch keeps rejecting or failing the status query; if the access token expired, \
     regenerate it and update the credentials file";

async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

/// Where the loop is in its cycle, recorded in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Querying,
    Notifying,
    Sleeping,
}

/// Counters returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub alerts: u64,
    pub failed_ticks: u64,
}

/// Tracks consecutive query failures to decide when to nag about credentials.
#[derive(Debug, Default)]
pub struct FailureStreak {
    consecutive: u32,
}

impl FailureStreak {
    pub fn reset(&mut self) {
        if self.consecutive > 0 {
            tracing::info!(
                failures = self.consecutive,
                "Live status query recovered"
            );
        }
        self.consecutive = 0;
    }

    /// Log a failed tick. Returns true when the credential hint was logged.
    pub fn record(&mut self, error: &AlertError) -> bool {
        self.consecutive += 1;
        tracing::warn!(consecutive = self.consecutive, "Tick failed: {error}");

        let hint = error.is_auth_failure() || self.consecutive % CREDENTIAL_HINT_EVERY == 0;
        if hint {
            tracing::warn!(consecutive = self.consecutive, "{CREDENTIAL_HINT}");
        }
        hint
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

/// Poll the tracker every `interval` and dispatch newly-live batches.
///
/// Never returns on a failed tick; only `shutdown` stops it. Cancellation is
/// observed while querying and while sleeping. An interrupted query leaves
/// the live set untouched.
pub async fn live_poll_loop<S: StatusSource>(
    mut tracker: LivenessTracker<S>,
    dispatcher: Dispatcher,
    interval: Duration,
    shutdown: CancellationToken,
) -> PollStats {
    let mut stats = PollStats::default();
    let mut streak = FailureStreak::default();
    let mut phase = PollPhase::Idle;

    tracing::info!(
        channels = tracker.watch_list().len(),
        interval_secs = interval.as_secs(),
        "Live poll loop started"
    );

    loop {
        phase = transition(phase, PollPhase::Querying);
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            outcome = tracker.poll() => outcome,
        };
        stats.ticks += 1;

        match outcome {
            Ok(events) => {
                streak.reset();
                if !events.is_empty() {
                    phase = transition(phase, PollPhase::Notifying);
                    stats.alerts += events.len() as u64;
                    let alerts = events.iter().map(LiveAlert::from).collect();
                    // The chooser task is detached; the next tick does not wait on it.
                    let _chooser = dispatcher.dispatch(alerts).await;
                }
            }
            Err(e) => {
                stats.failed_ticks += 1;
                streak.record(&e);
            }
        }

        phase = transition(phase, PollPhase::Sleeping);
        if sleep_or_cancel(&shutdown, interval).await {
            break;
        }
    }

    tracing::info!(
        ticks = stats.ticks,
        alerts = stats.alerts,
        failed_ticks = stats.failed_ticks,
        "Live poll loop stopped (shutdown)"
    );
    stats
}

fn transition(from: PollPhase, to: PollPhase) -> PollPhase {
    tracing::trace!(?from, ?to, "Poll phase");
    to
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use twitch_client::TwitchError;

    use super::*;
    use crate::channel::{ChannelId, WatchList};
    use crate::notification::{AlertText, Notifier};
    use crate::status::StreamStatus;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<&'static str>, u16>>>,
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_live(&self, _: &WatchList) -> Result<Vec<StreamStatus>, AlertError> {
            let next = self.responses.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()));
            match next {
                Ok(ids) => Ok(ids
                    .into_iter()
                    .map(|id| StreamStatus {
                        channel_id: ChannelId::from(id),
                        login: id.into(),
                        display_name: id.into(),
                        title: String::new(),
                        game_name: String::new(),
                        viewer_count: 1,
                        started_at: None,
                    })
                    .collect()),
                Err(status) => Err(AlertError::QueryFailed(TwitchError::ApiError {
                    status,
                    message: String::new(),
                })),
            }
        }
    }

    /// Cancels the loop once it has seen `stop_after` notifications.
    struct CountingNotifier {
        shown: Mutex<Vec<String>>,
        stop_after: usize,
        shutdown: CancellationToken,
    }

    impl Notifier for CountingNotifier {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn notify(&self, text: &AlertText) -> Result<(), AlertError> {
            let mut shown = self.shown.lock().unwrap();
            shown.push(text.summary.clone());
            if shown.len() >= self.stop_after {
                self.shutdown.cancel();
            }
            Ok(())
        }
    }

    fn tracker(script: Vec<Result<Vec<&'static str>, u16>>) -> LivenessTracker<ScriptedSource> {
        let watch_list = WatchList::new([ChannelId::from("a"), ChannelId::from("b")]);
        LivenessTracker::new(
            watch_list,
            ScriptedSource {
                responses: Mutex::new(script.into()),
            },
        )
    }

    #[tokio::test]
    async fn failed_tick_does_not_stop_loop_or_rearm() {
        let shutdown = CancellationToken::new();
        let notifier = Arc::new(CountingNotifier {
            shown: Mutex::new(Vec::new()),
            stop_after: 2,
            shutdown: shutdown.clone(),
        });
        let dispatcher = Dispatcher::new(notifier.clone(), None, false);
        let tracker = tracker(vec![Ok(vec!["a"]), Err(503), Ok(vec!["a", "b"])]);

        let stats = tokio::time::timeout(
            Duration::from_secs(5),
            live_poll_loop(tracker, dispatcher, Duration::from_millis(5), shutdown),
        )
        .await
        .unwrap();

        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.failed_ticks, 1);
        assert_eq!(stats.alerts, 2);
        assert_eq!(
            *notifier.shown.lock().unwrap(),
            vec!["Live now: a".to_string(), "Live now: b".to_string()]
        );
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_sleep() {
        let shutdown = CancellationToken::new();
        let dispatcher = Dispatcher::new(Arc::new(crate::notification::LogNotifier), None, false);
        let tracker = LivenessTracker::new(
            WatchList::default(),
            ScriptedSource {
                responses: Mutex::new(VecDeque::new()),
            },
        );

        let handle = tokio::spawn(live_poll_loop(
            tracker,
            dispatcher,
            Duration::from_secs(3600),
            shutdown.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.cancel();

        let stats = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.alerts, 0);
    }

    #[test]
    fn credential_hint_on_auth_failure_and_every_third_failure() {
        let mut streak = FailureStreak::default();
        let transient = AlertError::QueryFailed(TwitchError::ApiError {
            status: 500,
            message: String::new(),
        });
        let unauthorized = AlertError::QueryFailed(TwitchError::ApiError {
            status: 401,
            message: String::new(),
        });

        assert!(!streak.record(&transient));
        assert!(!streak.record(&transient));
        assert!(streak.record(&transient));
        assert!(!streak.record(&transient));

        streak.reset();
        assert_eq!(streak.consecutive(), 0);
        assert!(streak.record(&unauthorized));
    }
}
