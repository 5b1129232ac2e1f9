use crate::error::{Result, WatchStateError};
use crate::storage::{keys, PersistedStore};
use cinelist_models::{ContentId, ContentItem};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reject a catalog in which two items share an id
pub fn ensure_unique_ids(items: &[ContentItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    match items.iter().find(|item| !seen.insert(item.id)) {
        Some(item) => Err(WatchStateError::InvalidArgument(format!(
            "catalog contains content id {} more than once",
            item.id
        ))),
        None => Ok(()),
    }
}

/// Keep the first item for each id
fn dedupe_ids(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let before = items.len();
    let mut seen = HashSet::with_capacity(before);
    let items: Vec<ContentItem> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
    if items.len() != before {
        warn!("Catalog repeats {} content id(s), keeping the first of each", before - items.len());
    }
    items
}

/// Read-only source of content items
pub trait CatalogProvider: Send + Sync {
    fn list_content(&self) -> Vec<ContentItem>;

    fn get_content_by_id(&self, id: ContentId) -> Option<ContentItem> {
        self.list_content().into_iter().find(|item| item.id == id)
    }
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<ContentItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_content(&self) -> Vec<ContentItem> {
        self.items.clone()
    }

    fn get_content_by_id(&self, id: ContentId) -> Option<ContentItem> {
        self.items.iter().find(|item| item.id == id).cloned()
    }
}

/// Catalog held under the `catalog` key, falling back to a seed list.
///
/// The maintenance operations here edit the catalog itself; they never touch
/// watch entries, so deleting an item leaves any entry for it dangling.
pub struct StoredCatalog {
    store: Arc<dyn PersistedStore>,
    seed: Vec<ContentItem>,
}

impl StoredCatalog {
    pub fn new(store: Arc<dyn PersistedStore>, seed: Vec<ContentItem>) -> Self {
        Self {
            store,
            seed: dedupe_ids(seed),
        }
    }

    pub fn seed(&self) -> &[ContentItem] {
        &self.seed
    }

    fn load(&self) -> Vec<ContentItem> {
        match self.store.read(keys::CATALOG) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<ContentItem>>(&bytes) {
                Ok(items) => dedupe_ids(items),
                Err(e) => {
                    warn!("Stored catalog is corrupt ({}), using seed catalog", e);
                    self.seed.clone()
                }
            },
            Ok(None) => {
                debug!("No stored catalog, using seed catalog ({} items)", self.seed.len());
                self.seed.clone()
            }
            Err(e) => {
                warn!("Failed to read stored catalog ({}), using seed catalog", e);
                self.seed.clone()
            }
        }
    }

    fn save(&self, items: &[ContentItem]) -> Result<()> {
        let bytes = serde_json::to_vec(items)?;
        self.store.write(keys::CATALOG, &bytes)?;
        Ok(())
    }

    /// Write the seed list as the stored catalog
    pub fn write_seed(&self) -> Result<()> {
        self.save(&self.seed)
    }

    /// Append an item under the next free id (highest id + 1)
    pub fn add_content(&self, mut item: ContentItem) -> Result<ContentItem> {
        let mut items = self.load();
        let next_id = items.iter().map(|i| i.id.0).max().unwrap_or(0) + 1;
        item.id = ContentId(next_id);
        items.push(item.clone());
        self.save(&items)?;
        info!("Added content {} '{}'", item.id, item.title);
        Ok(item)
    }

    /// Replace the item with the same id
    pub fn update_content(&self, item: ContentItem) -> Result<ContentItem> {
        let mut items = self.load();
        let slot = items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or(WatchStateError::NotFound(item.id))?;
        *slot = item.clone();
        self.save(&items)?;
        info!("Updated content {}", item.id);
        Ok(item)
    }

    /// Returns whether an item was removed
    pub fn delete_content(&self, id: ContentId) -> Result<bool> {
        let mut items = self.load();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        info!("Deleted content {}", id);
        Ok(true)
    }
}

impl CatalogProvider for StoredCatalog {
    fn list_content(&self) -> Vec<ContentItem> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_catalog;
    use crate::storage::MemoryStore;

    fn catalog() -> (Arc<MemoryStore>, StoredCatalog) {
        let store = Arc::new(MemoryStore::new());
        let catalog = StoredCatalog::new(store.clone(), demo_catalog());
        (store, catalog)
    }

    #[test]
    fn test_falls_back_to_seed() {
        let (store, catalog) = catalog();
        assert_eq!(catalog.list_content().len(), 20);

        store.write(keys::CATALOG, b"{broken").unwrap();
        assert_eq!(catalog.list_content().len(), 20);
    }

    #[test]
    fn test_add_content_assigns_next_id() {
        let (_store, catalog) = catalog();
        let mut item = demo_catalog()[0].clone();
        item.title = "Dune".to_string();

        let added = catalog.add_content(item).unwrap();
        assert_eq!(added.id, ContentId(21));
        assert_eq!(catalog.get_content_by_id(ContentId(21)).unwrap().title, "Dune");
        assert_eq!(catalog.list_content().len(), 21);
    }

    #[test]
    fn test_update_and_delete_content() {
        let (_store, catalog) = catalog();

        let mut item = catalog.get_content_by_id(ContentId(3)).unwrap();
        item.platform = "Max".to_string();
        catalog.update_content(item).unwrap();
        assert_eq!(catalog.get_content_by_id(ContentId(3)).unwrap().platform, "Max");

        let mut missing = demo_catalog()[0].clone();
        missing.id = ContentId(999);
        assert!(matches!(catalog.update_content(missing), Err(WatchStateError::NotFound(ContentId(999)))));

        assert!(catalog.delete_content(ContentId(3)).unwrap());
        assert!(!catalog.delete_content(ContentId(3)).unwrap());
        assert!(catalog.get_content_by_id(ContentId(3)).is_none());
        assert_eq!(catalog.list_content().len(), 19);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let (store, catalog) = catalog();
        store.set_unavailable(true);
        assert!(matches!(catalog.delete_content(ContentId(1)), Err(WatchStateError::Storage(_))));
        assert!(catalog.get_content_by_id(ContentId(1)).is_some());
    }

    #[test]
    fn test_static_catalog_lookup() {
        let catalog = StaticCatalog::new(demo_catalog());
        assert_eq!(catalog.list_content().len(), 20);
        assert_eq!(catalog.get_content_by_id(ContentId(11)).unwrap().title, "Breaking Bad");
        assert!(catalog.get_content_by_id(ContentId(0)).is_none());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut items = demo_catalog();
        assert!(ensure_unique_ids(&items).is_ok());

        let mut twin = items[0].clone();
        twin.title = "Endgame again".to_string();
        items.push(twin);
        assert!(matches!(ensure_unique_ids(&items), Err(WatchStateError::InvalidArgument(_))));

        // A stored catalog that repeats an id keeps the first item only
        let (store, catalog) = catalog();
        store.write(keys::CATALOG, &serde_json::to_vec(&items).unwrap()).unwrap();
        let listed = catalog.list_content();
        assert_eq!(listed.len(), 20);
        assert_eq!(catalog.get_content_by_id(items[0].id).unwrap().title, items[0].title);

        let seeded = StoredCatalog::new(Arc::new(MemoryStore::new()), items);
        assert_eq!(seeded.list_content().len(), 20);
    }
}
