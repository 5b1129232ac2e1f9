use crate::catalog::{ensure_unique_ids, CatalogProvider, StoredCatalog};
use crate::error::{Result, WatchStateError};
use crate::profile::ProfileStore;
use crate::query::{self, CatalogView, FilterSpec, RawFilter};
use crate::seed;
use crate::stats::Statistics;
use crate::storage::{keys, FileStore, MemoryStore, PersistedStore};
use crate::watch_state::{Outcome, WatchStateStore, CORRUPT_WATCH_STATE_KEY};
use chrono::{DateTime, Utc};
use cinelist_config::{Config, PathManager, StatusAliases, StorageBackend};
use cinelist_models::{is_valid_user_rating, ContentId, ContentItem, Profile, WatchEntry, WatchStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Portable snapshot of everything the library persists.
///
/// Every part is optional on import; absent parts are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_state: Option<Vec<WatchEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
}

/// The surface the UI calls: catalog, watch state, profile and derived views
/// over one shared persisted store.
pub struct Library {
    store: Arc<dyn PersistedStore>,
    catalog: StoredCatalog,
    watch_state: WatchStateStore,
    profiles: ProfileStore,
    status_aliases: StatusAliases,
}

/// Keep the first warning of a multi-step operation
fn first_warning(
    warning: Option<WatchStateError>,
    next: Option<WatchStateError>,
) -> Option<WatchStateError> {
    warning.or(next)
}

impl Library {
    /// Seed any missing keys and load the watch state
    pub fn open(store: Arc<dyn PersistedStore>, seed: Vec<ContentItem>) -> Outcome<Self> {
        let catalog = StoredCatalog::new(store.clone(), seed);
        let profiles = ProfileStore::new(store.clone());

        let initialized = Self::initialize(store.as_ref(), &catalog, &profiles);
        let opened = WatchStateStore::open(store.clone());

        Outcome {
            warning: first_warning(initialized.warning, opened.warning),
            value: Self {
                store,
                catalog,
                watch_state: opened.value,
                profiles,
                status_aliases: StatusAliases::default(),
            },
        }
    }

    /// Build the store and seed described by `config`
    pub fn from_config(config: &Config, paths: &PathManager) -> anyhow::Result<Outcome<Self>> {
        let store: Arc<dyn PersistedStore> = match config.storage.backend {
            StorageBackend::File => {
                let dir = config.storage_dir(paths.storage_dir());
                debug!("Using file storage at {}", dir.display());
                Arc::new(FileStore::new(&dir)?)
            }
            StorageBackend::Memory => {
                debug!("Using in-memory storage");
                match config.storage.quota_bytes {
                    Some(quota) => Arc::new(MemoryStore::with_quota(quota)),
                    None => Arc::new(MemoryStore::new()),
                }
            }
        };

        let seed = match config.catalog.seed_file {
            Some(ref path) => seed::load_seed_file(path)?,
            None => seed::demo_catalog(),
        };

        let opened = Self::open(store, seed);
        Ok(Outcome {
            warning: opened.warning,
            value: opened.value.with_status_aliases(config.status_aliases.clone()),
        })
    }

    /// Extra status words accepted by [`Library::set_status`] and [`Library::query_raw`]
    pub fn with_status_aliases(mut self, aliases: StatusAliases) -> Self {
        self.status_aliases = aliases;
        self
    }

    fn initialize(store: &dyn PersistedStore, catalog: &StoredCatalog, profiles: &ProfileStore) -> Outcome<()> {
        let mut warning = None;

        let missing = |key: &str| matches!(store.read(key), Ok(None));

        if missing(keys::PROFILE) {
            warning = first_warning(warning, profiles.set(Profile::default()).warning);
        }
        if missing(keys::CATALOG) {
            if let Err(e) = catalog.write_seed() {
                warn!("Failed to seed catalog: {}", e);
                warning = first_warning(warning, Some(WatchStateError::PersistenceDegraded(e.to_string())));
            }
        }
        if missing(keys::WATCH_STATE) {
            if let Err(e) = store.write(keys::WATCH_STATE, b"[]") {
                warn!("Failed to seed watch state: {}", e);
                warning = first_warning(warning, Some(WatchStateError::PersistenceDegraded(e.to_string())));
            }
        }

        Outcome { value: (), warning }
    }

    pub fn catalog(&self) -> &StoredCatalog {
        &self.catalog
    }

    pub fn status_aliases(&self) -> &StatusAliases {
        &self.status_aliases
    }

    // Watch state

    pub fn get(&self, id: ContentId) -> Option<WatchEntry> {
        self.watch_state.get(id)
    }

    pub fn list_all(&self) -> Vec<WatchEntry> {
        self.watch_state.list_all()
    }

    pub fn upsert_status(&mut self, id: ContentId, status: WatchStatus) -> Outcome<WatchEntry> {
        self.watch_state.upsert_status(id, status)
    }

    /// Like [`Library::upsert_status`] but parses a status word, configured aliases included
    pub fn set_status(&mut self, id: ContentId, status: &str) -> Result<Outcome<WatchEntry>> {
        let parsed = self
            .status_aliases
            .resolve(status)
            .ok_or_else(|| WatchStateError::InvalidArgument(format!("unrecognized status '{}'", status)))?;
        Ok(self.watch_state.upsert_status(id, parsed))
    }

    pub fn remove(&mut self, id: ContentId) -> Outcome<bool> {
        self.watch_state.remove(id)
    }

    pub fn rate(&mut self, id: ContentId, rating: u8) -> Result<Outcome<WatchEntry>> {
        self.watch_state.rate(id, rating)
    }

    pub fn reload(&mut self) -> Outcome<usize> {
        self.watch_state.reload()
    }

    // Derived views

    /// Catalog item joined with its entry
    pub fn content(&self, id: ContentId) -> Result<CatalogView> {
        let item = self
            .catalog
            .get_content_by_id(id)
            .ok_or(WatchStateError::NotFound(id))?;
        Ok(CatalogView {
            entry: self.watch_state.get(id),
            item,
        })
    }

    pub fn query(&self, filter: &FilterSpec) -> Vec<CatalogView> {
        query::query(&self.catalog.list_content(), &self.watch_state.list_all(), filter)
    }

    pub fn query_raw(&self, raw: &RawFilter<'_>) -> Result<Vec<CatalogView>> {
        let filter = FilterSpec::from_raw(raw, |value| self.status_aliases.resolve(value))
            .map_err(WatchStateError::InvalidArgument)?;
        Ok(self.query(&filter))
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.catalog.list_content(), &self.watch_state.list_all())
    }

    /// Entries whose content is missing from the current catalog
    pub fn dangling_entries(&self) -> Vec<WatchEntry> {
        query::dangling_entries(&self.catalog.list_content(), &self.watch_state.list_all())
    }

    // Profile

    pub fn profile(&self) -> Profile {
        self.profiles.get()
    }

    pub fn update_profile<F>(&self, change: F) -> Outcome<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        self.profiles.update(change)
    }

    // Whole-store operations

    /// Clear every key, re-seed profile, catalog and an empty watch state,
    /// then reload
    pub fn reset_demo_data(&mut self) -> Outcome<()> {
        let mut warning = None;

        for key in keys::ALL.iter().copied().chain([CORRUPT_WATCH_STATE_KEY]) {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear '{}' during reset: {}", key, e);
                warning = first_warning(warning, Some(WatchStateError::PersistenceDegraded(e.to_string())));
            }
        }

        let initialized = Self::initialize(self.store.as_ref(), &self.catalog, &self.profiles);
        warning = first_warning(warning, initialized.warning);
        warning = first_warning(warning, self.watch_state.reload().warning);

        info!("Demo data reset");
        Outcome { value: (), warning }
    }

    pub fn export(&self) -> ExportBundle {
        ExportBundle {
            profile: Some(self.profiles.get()),
            content: Some(self.catalog.list_content()),
            watch_state: Some(self.watch_state.list_all()),
            export_date: Some(Utc::now()),
        }
    }

    /// Write the parts present in `bundle`, then reload the watch state.
    ///
    /// Every part is validated before anything is written. If a write fails,
    /// the keys already written are restored to their previous values.
    /// Returns the number of watch entries loaded afterwards.
    pub fn import(&mut self, bundle: &ExportBundle) -> Result<usize> {
        validate_bundle(bundle)?;

        let mut writes: Vec<(&str, Vec<u8>)> = Vec::with_capacity(3);
        if let Some(ref profile) = bundle.profile {
            writes.push((keys::PROFILE, serde_json::to_vec(profile)?));
        }
        if let Some(ref content) = bundle.content {
            writes.push((keys::CATALOG, serde_json::to_vec(content)?));
        }
        if let Some(ref entries) = bundle.watch_state {
            writes.push((keys::WATCH_STATE, serde_json::to_vec(entries)?));
        }

        let mut previous: Vec<(&str, Option<Vec<u8>>)> = Vec::with_capacity(writes.len());
        for (key, bytes) in &writes {
            previous.push((*key, self.store.read(key)?));
            if let Err(e) = self.store.write(key, bytes) {
                warn!("Import failed writing '{}' ({}), restoring previous data", key, e);
                self.restore(&previous);
                return Err(e.into());
            }
        }

        let loaded = self.watch_state.reload();
        if let Some(warning) = loaded.warning {
            return Err(warning);
        }
        info!("Imported data, {} watch entries loaded", loaded.value);
        Ok(loaded.value)
    }

    fn restore(&self, previous: &[(&str, Option<Vec<u8>>)]) {
        for (key, value) in previous.iter().rev() {
            let restored = match value {
                Some(bytes) => self.store.write(key, bytes),
                None => self.store.remove(key),
            };
            if let Err(e) = restored {
                warn!("Failed to restore '{}' after import error: {}", key, e);
            }
        }
    }
}

/// Checks that need no storage access: unique catalog ids and ratings in range
fn validate_bundle(bundle: &ExportBundle) -> Result<()> {
    if let Some(ref content) = bundle.content {
        ensure_unique_ids(content)?;
    }
    for entry in bundle.watch_state.iter().flatten() {
        if let Some(rating) = entry.user_rating {
            if !is_valid_user_rating(rating) {
                return Err(WatchStateError::InvalidArgument(format!(
                    "entry {} has rating {} outside 1-5",
                    entry.content_id, rating
                )));
            }
        }
    }
    Ok(())
}
