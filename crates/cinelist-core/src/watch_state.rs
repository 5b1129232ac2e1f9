use crate::error::{Result, WatchStateError};
use crate::storage::{keys, PersistedStore};
use chrono::Utc;
use cinelist_models::{is_valid_user_rating, ContentId, WatchEntry, WatchStatus};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key under which an unreadable watch-state payload is preserved
pub const CORRUPT_WATCH_STATE_KEY: &str = "watch_state.corrupt";

/// Result of a mutation that always applies in memory.
///
/// `warning` is `Some(PersistenceDegraded)` when the write to the persisted
/// store failed. The in-memory state still holds the change for the rest of
/// the session but a later [`WatchStateStore::reload`] will drop it.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<WatchStateError>,
}

impl<T> Outcome<T> {
    pub fn persisted(value: T) -> Self {
        Self { value, warning: None }
    }

    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            warning: Some(WatchStateError::PersistenceDegraded(reason.into())),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Sole owner of the content id → watch entry mapping
pub struct WatchStateStore {
    store: Arc<dyn PersistedStore>,
    entries: BTreeMap<ContentId, WatchEntry>,
}

impl WatchStateStore {
    /// Create the store and hydrate it from `store`
    pub fn open(store: Arc<dyn PersistedStore>) -> Outcome<Self> {
        let mut watch_state = Self {
            store,
            entries: BTreeMap::new(),
        };
        let loaded = watch_state.reload();
        Outcome {
            value: watch_state,
            warning: loaded.warning,
        }
    }

    pub fn get(&self, id: ContentId) -> Option<WatchEntry> {
        self.entries.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot ordered by content id
    pub fn list_all(&self) -> Vec<WatchEntry> {
        self.entries.values().cloned().collect()
    }

    /// Set the status of `id`, creating the entry if needed.
    ///
    /// `last_changed_at` is refreshed on every call, including repeats of the
    /// current status.
    pub fn upsert_status(&mut self, id: ContentId, status: WatchStatus) -> Outcome<WatchEntry> {
        let now = Utc::now();
        let entry = self
            .entries
            .entry(id)
            .and_modify(|entry| {
                entry.status = status;
                entry.last_changed_at = now;
            })
            .or_insert_with(|| WatchEntry::new(id, status, now))
            .clone();

        debug!("Set status of {} to {}", id, status);
        self.persist(entry)
    }

    /// Parse a status word from the UI (aliases accepted) and apply it
    pub fn upsert_status_str(&mut self, id: ContentId, status: &str) -> Result<Outcome<WatchEntry>> {
        let status = WatchStatus::from_alias(status)
            .ok_or_else(|| WatchStateError::InvalidArgument(format!("unrecognized status '{}'", status)))?;
        Ok(self.upsert_status(id, status))
    }

    /// Returns whether an entry existed
    pub fn remove(&mut self, id: ContentId) -> Outcome<bool> {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            debug!("Removed watch entry {}", id);
        }
        self.persist(removed)
    }

    /// Rate `id` with 1 to 5 stars.
    ///
    /// The entry ends up `completed` with the rating set, created if it did
    /// not exist, and the mapping is written once for the combined change.
    pub fn rate(&mut self, id: ContentId, rating: u8) -> Result<Outcome<WatchEntry>> {
        if !is_valid_user_rating(rating) {
            return Err(WatchStateError::InvalidArgument(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }

        let now = Utc::now();
        let entry = self
            .entries
            .entry(id)
            .or_insert_with(|| WatchEntry::new(id, WatchStatus::Completed, now));
        if entry.status != WatchStatus::Completed {
            entry.status = WatchStatus::Completed;
            entry.last_changed_at = now;
        }
        entry.user_rating = Some(rating);
        let entry = entry.clone();

        debug!("Rated {} with {} stars", id, rating);
        Ok(self.persist(entry))
    }

    /// Replace the in-memory mapping with what the persisted store holds.
    ///
    /// Returns the number of entries loaded. Unpersisted changes are dropped.
    pub fn reload(&mut self) -> Outcome<usize> {
        self.entries.clear();

        let bytes = match self.store.read(keys::WATCH_STATE) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No persisted watch state, starting empty");
                return Outcome::persisted(0);
            }
            Err(e) => {
                warn!("Failed to read persisted watch state: {}", e);
                return Outcome::degraded(0, format!("failed to read watch state: {}", e));
            }
        };

        let persisted: Vec<WatchEntry> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Watch state corruption detected: {}. Preserving payload under '{}' and starting empty.",
                    e, CORRUPT_WATCH_STATE_KEY
                );
                if let Err(backup_err) = self.store.write(CORRUPT_WATCH_STATE_KEY, &bytes) {
                    warn!("Failed to preserve corrupt watch state: {}", backup_err);
                }
                return Outcome::degraded(0, format!("persisted watch state is corrupt: {}", e));
            }
        };

        let total = persisted.len();
        for entry in persisted {
            // A later duplicate replaces an earlier one
            self.entries.insert(entry.content_id, entry);
        }
        if self.entries.len() < total {
            warn!(
                "Collapsed {} duplicate watch entries while loading",
                total - self.entries.len()
            );
        }

        info!("Loaded {} watch entries", self.entries.len());
        Outcome::persisted(self.entries.len())
    }

    /// Write the whole mapping; failures degrade to a warning
    fn persist<T>(&self, value: T) -> Outcome<T> {
        let entries: Vec<&WatchEntry> = self.entries.values().collect();
        let bytes = match serde_json::to_vec(&entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize watch state: {}", e);
                return Outcome::degraded(value, format!("failed to serialize watch state: {}", e));
            }
        };

        match self.store.write(keys::WATCH_STATE, &bytes) {
            Ok(()) => Outcome::persisted(value),
            Err(e) => {
                warn!("Watch state kept in memory only: {}", e);
                Outcome::degraded(value, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn open(store: Arc<MemoryStore>) -> WatchStateStore {
        let opened = WatchStateStore::open(store);
        assert!(!opened.is_degraded());
        opened.into_value()
    }

    #[test]
    fn test_upsert_last_write_wins() {
        let mut watch = open(Arc::new(MemoryStore::new()));
        let id = ContentId(7);

        for status in [WatchStatus::Pending, WatchStatus::Completed, WatchStatus::Watching] {
            assert!(!watch.upsert_status(id, status).is_degraded());
        }
        assert_eq!(watch.get(id).unwrap().status, WatchStatus::Watching);
        assert_eq!(watch.len(), 1);
    }

    #[test]
    fn test_upsert_same_status_is_idempotent() {
        let mut watch = open(Arc::new(MemoryStore::new()));
        let id = ContentId(3);

        let first = watch.upsert_status(id, WatchStatus::Watching).into_value();
        let second = watch.upsert_status(id, WatchStatus::Watching).into_value();

        assert_eq!(first.status, second.status);
        assert_eq!(first.user_rating, second.user_rating);
        assert!(second.last_changed_at >= first.last_changed_at);
        assert_eq!(watch.list_all().len(), 1);
    }

    #[test]
    fn test_upsert_keeps_rating() {
        let mut watch = open(Arc::new(MemoryStore::new()));
        let id = ContentId(3);
        watch.rate(id, 4).unwrap();

        let entry = watch.upsert_status(id, WatchStatus::Watching).into_value();
        assert_eq!(entry.status, WatchStatus::Watching);
        assert_eq!(entry.user_rating, Some(4));
    }

    #[test]
    fn test_upsert_status_str_aliases() {
        let mut watch = open(Arc::new(MemoryStore::new()));

        let entry = watch.upsert_status_str(ContentId(1), "watched").unwrap().into_value();
        assert_eq!(entry.status, WatchStatus::Completed);

        let entry = watch.upsert_status_str(ContentId(1), "Watchlist").unwrap().into_value();
        assert_eq!(entry.status, WatchStatus::Pending);
    }

    #[test]
    fn test_unrecognized_status_does_not_mutate() {
        let mut watch = open(Arc::new(MemoryStore::new()));
        watch.upsert_status(ContentId(1), WatchStatus::Watching);

        let err = watch.upsert_status_str(ContentId(1), "dropped").unwrap_err();
        assert!(matches!(err, WatchStateError::InvalidArgument(_)));
        assert!(watch.upsert_status_str(ContentId(2), "").is_err());

        assert_eq!(watch.get(ContentId(1)).unwrap().status, WatchStatus::Watching);
        assert!(watch.get(ContentId(2)).is_none());
    }

    #[test]
    fn test_rate_from_any_prior_state() {
        let mut watch = open(Arc::new(MemoryStore::new()));

        // Absent
        let entry = watch.rate(ContentId(1), 5).unwrap().into_value();
        assert_eq!(entry.status, WatchStatus::Completed);
        assert_eq!(entry.user_rating, Some(5));

        // Pending and watching
        watch.upsert_status(ContentId(2), WatchStatus::Pending);
        watch.upsert_status(ContentId(3), WatchStatus::Watching);
        for id in [ContentId(2), ContentId(3)] {
            watch.rate(id, 2).unwrap();
            let entry = watch.get(id).unwrap();
            assert_eq!(entry.status, WatchStatus::Completed);
            assert_eq!(entry.user_rating, Some(2));
        }

        // Re-rating a completed entry keeps its timestamp
        let before = watch.get(ContentId(1)).unwrap().last_changed_at;
        watch.rate(ContentId(1), 3).unwrap();
        let after = watch.get(ContentId(1)).unwrap();
        assert_eq!(after.user_rating, Some(3));
        assert_eq!(after.last_changed_at, before);
    }

    #[test]
    fn test_rate_rejects_out_of_range() {
        let mut watch = open(Arc::new(MemoryStore::new()));
        watch.upsert_status(ContentId(1), WatchStatus::Watching);

        for rating in [0, 6, 10] {
            let err = watch.rate(ContentId(1), rating).unwrap_err();
            assert!(matches!(err, WatchStateError::InvalidArgument(_)));
        }
        assert!(watch.rate(ContentId(2), 0).is_err());

        assert_eq!(watch.get(ContentId(1)).unwrap().status, WatchStatus::Watching);
        assert_eq!(watch.get(ContentId(1)).unwrap().user_rating, None);
        assert!(watch.get(ContentId(2)).is_none());
    }

    #[test]
    fn test_rate_writes_combined_state_once() {
        let store = Arc::new(MemoryStore::new());
        let mut watch = open(store.clone());
        watch.rate(ContentId(9), 4).unwrap();

        let persisted: Vec<WatchEntry> =
            serde_json::from_slice(&store.read(keys::WATCH_STATE).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].status, WatchStatus::Completed);
        assert_eq!(persisted[0].user_rating, Some(4));
    }

    #[test]
    fn test_remove() {
        let mut watch = open(Arc::new(MemoryStore::new()));
        watch.rate(ContentId(1), 3).unwrap();

        assert!(watch.remove(ContentId(1)).into_value());
        assert!(watch.get(ContentId(1)).is_none());
        assert!(!watch.remove(ContentId(1)).into_value());
        assert!(!watch.remove(ContentId(42)).into_value());
        assert!(watch.is_empty());
    }

    #[test]
    fn test_reload_round_trip_file_store() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(dir.path()).unwrap());

        let mut watch = WatchStateStore::open(store.clone()).into_value();
        watch.upsert_status(ContentId(2), WatchStatus::Watching);
        watch.rate(ContentId(5), 5).unwrap();
        let written = watch.list_all();

        let reloaded = watch.reload();
        assert_eq!(reloaded.value, 2);
        assert_eq!(watch.list_all(), written);

        // A second process opening the same directory sees the same entries
        let other = WatchStateStore::open(store).into_value();
        assert_eq!(other.get(ContentId(2)).unwrap().status, WatchStatus::Watching);
        assert_eq!(other.list_all(), written);
    }

    #[test]
    fn test_reload_replaces_rather_than_merges() {
        let store = Arc::new(MemoryStore::new());
        let mut watch = open(store.clone());
        watch.upsert_status(ContentId(1), WatchStatus::Watching);

        store.write(keys::WATCH_STATE, b"[]").unwrap();
        watch.reload();
        assert!(watch.get(ContentId(1)).is_none());
    }

    #[test]
    fn test_degraded_persistence_keeps_memory_state() {
        let store = Arc::new(MemoryStore::new());
        let mut watch = open(store.clone());
        watch.upsert_status(ContentId(1), WatchStatus::Pending);

        store.set_unavailable(true);
        let outcome = watch.upsert_status(ContentId(2), WatchStatus::Watching);
        assert!(matches!(outcome.warning, Some(WatchStateError::PersistenceDegraded(_))));
        assert_eq!(watch.get(ContentId(2)).unwrap().status, WatchStatus::Watching);

        let outcome = watch.rate(ContentId(1), 5).unwrap();
        assert!(outcome.is_degraded());
        assert_eq!(watch.get(ContentId(1)).unwrap().status, WatchStatus::Completed);

        // Reload drops what never reached storage
        store.set_unavailable(false);
        watch.reload();
        assert!(watch.get(ContentId(2)).is_none());
        assert_eq!(watch.get(ContentId(1)).unwrap().status, WatchStatus::Pending);
    }

    #[test]
    fn test_quota_exceeded_degrades() {
        let store = Arc::new(MemoryStore::with_quota(150));
        let mut watch = open(store);

        let mut degraded = false;
        for id in 1..=10 {
            degraded |= watch.upsert_status(ContentId(id), WatchStatus::Pending).is_degraded();
        }
        assert!(degraded);
        assert_eq!(watch.len(), 10);
    }

    #[test]
    fn test_corrupt_payload_is_preserved() {
        let store = Arc::new(MemoryStore::new());
        store.write(keys::WATCH_STATE, b"[{\"content_id\": ").unwrap();

        let opened = WatchStateStore::open(store.clone());
        assert!(opened.is_degraded());
        assert!(opened.value.is_empty());
        assert_eq!(
            store.read(CORRUPT_WATCH_STATE_KEY).unwrap().unwrap(),
            b"[{\"content_id\": ".to_vec()
        );
    }

    #[test]
    fn test_duplicate_persisted_entries_collapse() {
        let store = Arc::new(MemoryStore::new());
        let payload = r#"[
            {"content_id": 4, "status": "watchlist", "last_changed_at": "2024-01-01T00:00:00Z"},
            {"content_id": 4, "status": "watched", "last_changed_at": "2024-02-01T00:00:00Z", "user_rating": 3}
        ]"#;
        store.write(keys::WATCH_STATE, payload.as_bytes()).unwrap();

        let watch = open(store);
        assert_eq!(watch.len(), 1);
        let entry = watch.get(ContentId(4)).unwrap();
        assert_eq!(entry.status, WatchStatus::Completed);
        assert_eq!(entry.user_rating, Some(3));
    }
}
