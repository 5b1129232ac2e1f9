use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical watch status.
///
/// Older list views used other words for the same states; those are accepted
/// as aliases when parsing and deserializing, but only the canonical name is
/// ever written back:
///
/// | canonical   | aliases                  |
/// |-------------|--------------------------|
/// | `pending`   | `watchlist`, `unwatched` |
/// | `watching`  |                          |
/// | `completed` | `watched`                |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    /// Want to watch
    #[serde(alias = "watchlist", alias = "unwatched")]
    Pending,
    /// Currently watching
    Watching,
    /// Finished watching
    #[serde(alias = "watched")]
    Completed,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 3] = [WatchStatus::Pending, WatchStatus::Watching, WatchStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Pending => "pending",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
        }
    }

    /// Resolve a canonical name or one of the built-in aliases
    pub fn from_alias(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" | "watchlist" | "unwatched" => Some(WatchStatus::Pending),
            "watching" => Some(WatchStatus::Watching),
            "completed" | "watched" => Some(WatchStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(s).ok_or_else(|| {
            format!("Invalid status: {}. Use 'pending', 'watching' or 'completed'", s.trim())
        })
    }
}
