//! Search history and user preferences

use crate::country::ALL_REGIONS;
use serde::{Deserialize, Serialize};

pub const SEARCH_HISTORY_KEY: &str = "search-history";
pub const PREFERENCES_KEY: &str = "user-preferences";

/// Maximum number of remembered searches
pub const MAX_SEARCH_HISTORY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchHistoryEntry {
    pub query: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Record `query` at the front of `history`
///
/// The query is trimmed, earlier occurrences are dropped and the list is
/// capped at `max_items`. Returns `None` for a blank query.
pub fn push_search(
    history: Vec<SearchHistoryEntry>,
    query: &str,
    now_ms: i64,
    max_items: usize,
) -> Option<Vec<SearchHistoryEntry>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let mut updated: Vec<SearchHistoryEntry> = history
        .into_iter()
        .filter(|entry| entry.query != query)
        .collect();

    updated.insert(
        0,
        SearchHistoryEntry {
            query: query.to_string(),
            timestamp: now_ms,
        },
    );
    updated.truncate(max_items);

    Some(updated)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserPreferences {
    pub region: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            region: ALL_REGIONS.to_string(),
        }
    }
}

/// Partial update applied over the stored preferences
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub region: Option<String>,
}

impl UserPreferences {
    pub fn merge(self, update: PreferencesUpdate) -> Self {
        Self {
            region: update.region.unwrap_or(self.region),
        }
    }
}
