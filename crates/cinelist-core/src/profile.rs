use crate::storage::{keys, PersistedStore};
use crate::watch_state::Outcome;
use cinelist_models::Profile;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads and writes the user profile under the `profile` key
pub struct ProfileStore {
    store: Arc<dyn PersistedStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn PersistedStore>) -> Self {
        Self { store }
    }

    /// Stored profile, or the default one when missing or unreadable
    pub fn get(&self) -> Profile {
        match self.store.read(keys::PROFILE) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Stored profile is corrupt ({}), using default profile", e);
                Profile::default()
            }),
            Ok(None) => {
                debug!("No stored profile, using default profile");
                Profile::default()
            }
            Err(e) => {
                warn!("Failed to read profile ({}), using default profile", e);
                Profile::default()
            }
        }
    }

    pub fn set(&self, profile: Profile) -> Outcome<Profile> {
        let bytes = match serde_json::to_vec(&profile) {
            Ok(bytes) => bytes,
            Err(e) => return Outcome::degraded(profile, e.to_string()),
        };
        match self.store.write(keys::PROFILE, &bytes) {
            Ok(()) => Outcome::persisted(profile),
            Err(e) => {
                warn!("Profile change kept for this session only: {}", e);
                Outcome::degraded(profile, e.to_string())
            }
        }
    }

    /// Apply `change` to the current profile and store the result
    pub fn update<F>(&self, change: F) -> Outcome<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        let mut profile = self.get();
        change(&mut profile);
        self.set(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_default_when_missing_or_corrupt() {
        let store = Arc::new(MemoryStore::new());
        let profiles = ProfileStore::new(store.clone());
        assert_eq!(profiles.get(), Profile::default());

        store.write(keys::PROFILE, b"not json").unwrap();
        assert_eq!(profiles.get(), Profile::default());
    }

    #[test]
    fn test_update_persists() {
        let store = Arc::new(MemoryStore::new());
        let profiles = ProfileStore::new(store.clone());

        let outcome = profiles.update(|p| {
            p.name = "Ana".to_string();
            p.preferences.autoplay = false;
        });
        assert!(!outcome.is_degraded());

        let reread = ProfileStore::new(store).get();
        assert_eq!(reread.name, "Ana");
        assert!(!reread.preferences.autoplay);
        assert_eq!(reread.avatar, Profile::default().avatar);
    }

    #[test]
    fn test_update_degrades_when_storage_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let profiles = ProfileStore::new(store.clone());
        store.set_unavailable(true);

        let outcome = profiles.update(|p| p.name = "Ana".to_string());
        assert!(outcome.is_degraded());
        assert_eq!(outcome.value.name, "Ana");
        assert_eq!(profiles.get(), Profile::default());
    }
}
