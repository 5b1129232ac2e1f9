use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::content::ContentId;
use crate::status::WatchStatus;

pub const MIN_USER_RATING: u8 = 1;
pub const MAX_USER_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEntry {
    pub content_id: ContentId, // May reference an id the current catalog no longer has
    pub status: WatchStatus,
    pub last_changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>, // 1-5 stars
}

impl WatchEntry {
    pub fn new(content_id: ContentId, status: WatchStatus, now: DateTime<Utc>) -> Self {
        Self {
            content_id,
            status,
            last_changed_at: now,
            user_rating: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == WatchStatus::Completed
    }
}

pub fn is_valid_user_rating(rating: u8) -> bool {
    (MIN_USER_RATING..=MAX_USER_RATING).contains(&rating)
}
