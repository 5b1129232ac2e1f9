pub mod content;
pub mod profile;
pub mod status;
pub mod watch_entry;

pub use content::{ContentId, ContentItem, ContentType, Runtime, DEFAULT_SERIES_MINUTES};
pub use profile::{Preferences, Profile};
pub use status::WatchStatus;
pub use watch_entry::{is_valid_user_rating, WatchEntry, MAX_USER_RATING, MIN_USER_RATING};
