//! Channel identifiers and the watch-list.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Twitch user id of a watched broadcaster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The fixed set of channels the daemon monitors, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchList {
    ids: Vec<ChannelId>,
    members: HashSet<ChannelId>,
}

impl WatchList {
    /// Build a watch-list, dropping repeated ids (first occurrence wins).
    pub fn new(ids: impl IntoIterator<Item = ChannelId>) -> Self {
        let mut list = Self::default();
        for id in ids {
            list.insert(id);
        }
        list
    }

    /// Returns false if `id` was already watched.
    pub fn insert(&mut self, id: ChannelId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &ChannelId) -> bool {
        self.members.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelId> {
        self.ids.iter()
    }

    pub fn as_strings(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.as_str().to_string()).collect()
    }
}

impl FromIterator<ChannelId> for WatchList {
    fn from_iter<I: IntoIterator<Item = ChannelId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_list_drops_duplicates_and_keeps_order() {
        let list: WatchList = ["202", "101", "202", "303"]
            .into_iter()
            .map(ChannelId::from)
            .collect();

        assert_eq!(list.len(), 3);
        assert_eq!(list.as_strings(), vec!["202", "101", "303"]);
        assert!(list.contains(&ChannelId::from("101")));
        assert!(!list.contains(&ChannelId::from("404")));
    }
}
