use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use twitch_client::TwitchError;

use super::*;

/// Replays scripted responses; each call pops the next one.
#[derive(Clone, Default)]
struct ScriptedSource {
    responses: Arc<Mutex<VecDeque<Result<Vec<StreamStatus>, AlertError>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn push_live(&self, ids: &[&str]) {
        let statuses = ids.iter().map(|id| live(id)).collect();
        self.responses.lock().unwrap().push_back(Ok(statuses));
    }

    fn push_failure(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(AlertError::QueryFailed(TwitchError::ApiError {
                status: 503,
                message: "upstream unavailable".into(),
            })));
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_live(&self, _watch_list: &WatchList) -> Result<Vec<StreamStatus>, AlertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn live(id: &str) -> StreamStatus {
    StreamStatus {
        channel_id: ChannelId::from(id),
        login: format!("login{id}"),
        display_name: format!("Streamer{id}"),
        title: format!("title {id}"),
        game_name: String::new(),
        viewer_count: 10,
        started_at: None,
    }
}

fn watch(ids: &[&str]) -> WatchList {
    ids.iter().map(|id| ChannelId::from(*id)).collect()
}

fn ids(events: &[StreamStatus]) -> Vec<&str> {
    events.iter().map(|s| s.channel_id.as_str()).collect()
}

fn state(ids: &[&str]) -> LiveState {
    ids.iter().map(|id| ChannelId::from(*id)).collect()
}

#[tokio::test]
async fn example_sequence_notifies_once_per_live_session() {
    let source = ScriptedSource::default();
    source.push_live(&["101"]);
    source.push_live(&["101", "202"]);
    source.push_live(&[]);
    source.push_live(&["101"]);
    let mut tracker = LivenessTracker::new(watch(&["101", "202"]), source.clone());

    let events = tracker.poll().await.unwrap();
    assert_eq!(ids(&events), vec!["101"]);
    assert_eq!(tracker.live_state(), &state(&["101"]));

    let events = tracker.poll().await.unwrap();
    assert_eq!(ids(&events), vec!["202"]);
    assert_eq!(tracker.live_state(), &state(&["101", "202"]));

    let events = tracker.poll().await.unwrap();
    assert!(events.is_empty());
    assert!(tracker.live_state().is_empty());

    let events = tracker.poll().await.unwrap();
    assert_eq!(ids(&events), vec!["101"]);
    assert_eq!(source.calls(), 4);
}

#[tokio::test]
async fn unchanged_live_set_is_idempotent() {
    let source = ScriptedSource::default();
    source.push_live(&["101", "202"]);
    source.push_live(&["101", "202"]);
    let mut tracker = LivenessTracker::new(watch(&["101", "202", "303"]), source);

    assert_eq!(tracker.poll().await.unwrap().len(), 2);
    assert!(tracker.poll().await.unwrap().is_empty());
    assert_eq!(tracker.live_state(), &state(&["101", "202"]));
}

#[tokio::test]
async fn offline_then_live_again_rearms() {
    let source = ScriptedSource::default();
    source.push_live(&["101"]);
    source.push_live(&["101"]);
    source.push_live(&[]);
    source.push_live(&["101"]);
    source.push_live(&["101"]);
    let mut tracker = LivenessTracker::new(watch(&["101"]), source);

    let mut total = 0;
    for _ in 0..5 {
        total += tracker.poll().await.unwrap().len();
    }
    assert_eq!(total, 2);
}

#[tokio::test]
async fn empty_watch_list_makes_no_query() {
    let source = ScriptedSource::default();
    source.push_live(&["101"]);
    let mut tracker = LivenessTracker::new(WatchList::default(), source.clone());

    assert!(tracker.poll().await.unwrap().is_empty());
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn failed_query_leaves_live_state_untouched() {
    let source = ScriptedSource::default();
    source.push_live(&["101"]);
    source.push_failure();
    source.push_live(&["101"]);
    let mut tracker = LivenessTracker::new(watch(&["101", "202"]), source);

    assert_eq!(ids(&tracker.poll().await.unwrap()), vec!["101"]);
    let before = tracker.live_state().clone();

    let err = tracker.poll().await.unwrap_err();
    assert!(matches!(err, AlertError::QueryFailed(_)));
    assert_eq!(tracker.live_state(), &before);

    assert!(tracker.poll().await.unwrap().is_empty());
    assert_eq!(tracker.live_state(), &state(&["101"]));
}

#[test]
fn diff_reports_exactly_the_new_subset() {
    let watch_list = watch(&["1", "2", "3", "4"]);
    let previous = state(&["1", "2"]);

    let diff = diff_live(&watch_list, &previous, vec![live("3"), live("2"), live("4")]);

    assert_eq!(ids(&diff.newly_live), vec!["3", "4"]);
    assert_eq!(diff.rearmed, vec![ChannelId::from("1")]);
    assert_eq!(diff.live, state(&["2", "3", "4"]));
}

#[test]
fn diff_ignores_unwatched_and_duplicate_records() {
    let watch_list = watch(&["1"]);

    let diff = diff_live(
        &watch_list,
        &LiveState::default(),
        vec![live("1"), live("99"), live("1")],
    );

    assert_eq!(ids(&diff.newly_live), vec!["1"]);
    assert_eq!(diff.live, state(&["1"]));
}
