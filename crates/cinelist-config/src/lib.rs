pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, LoggingConfig, StatusAliases, StorageBackend, StorageConfig};
pub use paths::{PathManager, container_base_path};
