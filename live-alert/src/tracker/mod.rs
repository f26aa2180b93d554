//! Liveness tracker: decides which watched channels are newly live.
//!
//! The tracker owns the watch-list and the set of channels believed live.
//! Each [`LivenessTracker::poll`] queries upstream once and diffs the result:
//! channels not yet tracked become newly-live events, tracked channels that
//! are no longer reported are rearmed silently. A failed query leaves the
//! live set untouched so an outage is never read as "everyone went offline".

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::channel::{ChannelId, WatchList};
use crate::error::AlertError;
use crate::status::{StatusSource, StreamStatus};

/// Channels believed live since they were last announced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveState {
    live: HashSet<ChannelId>,
}

impl LiveState {
    pub fn contains(&self, id: &ChannelId) -> bool {
        self.live.contains(id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelId> {
        self.live.iter()
    }
}

impl FromIterator<ChannelId> for LiveState {
    fn from_iter<I: IntoIterator<Item = ChannelId>>(iter: I) -> Self {
        Self {
            live: iter.into_iter().collect(),
        }
    }
}

/// Outcome of diffing one query response against the previous live set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveDiff {
    /// Newly-live channels, in upstream response order.
    pub newly_live: Vec<StreamStatus>,
    /// Channels dropped from the live set because they went offline.
    pub rearmed: Vec<ChannelId>,
    /// The live set to carry into the next tick.
    pub live: LiveState,
}

/// Pure diff of a successful query response.
///
/// Records for channels outside the watch-list are ignored and a channel
/// listed twice in one response yields at most one event.
pub fn diff_live(
    watch_list: &WatchList,
    previous: &LiveState,
    statuses: Vec<StreamStatus>,
) -> LiveDiff {
    let mut live = LiveState::default();
    let mut newly_live = Vec::new();

    for status in statuses {
        if !watch_list.contains(&status.channel_id) {
            tracing::debug!(channel = %status.channel_id, "Ignoring unwatched channel in response");
            continue;
        }
        if !live.live.insert(status.channel_id.clone()) {
            continue;
        }
        if !previous.contains(&status.channel_id) {
            newly_live.push(status);
        }
    }

    let mut rearmed: Vec<ChannelId> = previous
        .iter()
        .filter(|id| !live.contains(id))
        .cloned()
        .collect();
    rearmed.sort();

    LiveDiff {
        newly_live,
        rearmed,
        live,
    }
}

/// Holds the watch-list and live set; queries a [`StatusSource`] each tick.
pub struct LivenessTracker<S> {
    watch_list: WatchList,
    live: LiveState,
    source: S,
}

impl<S: StatusSource> LivenessTracker<S> {
    pub fn new(watch_list: WatchList, source: S) -> Self {
        Self {
            watch_list,
            live: LiveState::default(),
            source,
        }
    }

    pub fn watch_list(&self) -> &WatchList {
        &self.watch_list
    }

    pub fn live_state(&self) -> &LiveState {
        &self.live
    }

    /// Run one query and return the channels that just went live.
    ///
    /// An empty watch-list returns no events without contacting upstream.
    /// On error the live set is left exactly as it was.
    pub async fn poll(&mut self) -> Result<Vec<StreamStatus>, AlertError> {
        if self.watch_list.is_empty() {
            tracing::debug!("Watch-list is empty, skipping status query");
            return Ok(Vec::new());
        }

        let statuses = self.source.fetch_live(&self.watch_list).await?;
        let diff = diff_live(&self.watch_list, &self.live, statuses);

        for id in &diff.rearmed {
            tracing::info!(channel = %id, "Channel went offline, rearmed");
        }
        for status in &diff.newly_live {
            tracing::info!(
                channel = %status.channel_id,
                name = %status.display_name,
                viewers = status.viewer_count,
                "Channel went live"
            );
        }

        self.live = diff.live;
        Ok(diff.newly_live)
    }
}
