pub mod catalog;
pub mod error;
pub mod library;
pub mod profile;
pub mod query;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod watch_state;

pub use catalog::{CatalogProvider, StaticCatalog, StoredCatalog};
pub use error::{Result, StorageError, WatchStateError};
pub use library::{ExportBundle, Library};
pub use profile::ProfileStore;
pub use query::{CatalogView, FilterSpec, RawFilter, SortKey};
pub use stats::{Statistics, TypeStats};
pub use storage::{FileStore, MemoryStore, PersistedStore};
pub use watch_state::{Outcome, WatchStateStore};
