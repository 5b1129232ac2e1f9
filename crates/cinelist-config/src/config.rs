use cinelist_models::WatchStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub status_aliases: StatusAliases,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `dir`
    File,
    /// Process-local, lost on exit
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Overrides the platform storage directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Byte quota for the memory backend
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON array of content items replacing the built-in demo catalog
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Extra UI-boundary words mapped onto the canonical statuses.
///
/// The built-in aliases (`watchlist`, `unwatched`, `watched`) always apply;
/// entries here only add to them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StatusAliases {
    #[serde(flatten)]
    pub to_canonical: HashMap<String, WatchStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            dir: None,
            quota_bytes: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl StatusAliases {
    /// Resolve a UI word to a status: built-in names first, then configured aliases
    pub fn resolve(&self, value: &str) -> Option<WatchStatus> {
        WatchStatus::from_alias(value).or_else(|| {
            let key = value.trim().to_lowercase();
            self.to_canonical
                .iter()
                .find(|(alias, _)| alias.trim().to_lowercase() == key)
                .map(|(_, status)| *status)
        })
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.quota_bytes == Some(0) {
            return Err(anyhow::anyhow!("storage.quota_bytes must be greater than zero"));
        }

        if self.storage.quota_bytes.is_some() && self.storage.backend != StorageBackend::Memory {
            return Err(anyhow::anyhow!("storage.quota_bytes is only supported by the memory backend"));
        }

        for (alias, status) in &self.status_aliases.to_canonical {
            if alias.trim().is_empty() {
                return Err(anyhow::anyhow!("status alias for '{}' cannot be empty", status));
            }
            // An alias may restate a built-in name but never redirect it
            if let Some(builtin) = WatchStatus::from_alias(alias) {
                if builtin != *status {
                    return Err(anyhow::anyhow!(
                        "status alias '{}' conflicts with built-in status '{}'",
                        alias,
                        builtin
                    ));
                }
            }
        }

        if let Some(ref seed) = self.catalog.seed_file {
            if !seed.exists() {
                return Err(anyhow::anyhow!("catalog.seed_file does not exist: {}", seed.display()));
            }
        }

        Ok(())
    }

    /// Storage directory, honoring the override
    pub fn storage_dir(&self, default_dir: PathBuf) -> PathBuf {
        self.storage.dir.clone().unwrap_or(default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config.storage.quota_bytes = Some(1024);
        config
            .status_aliases
            .to_canonical
            .insert("seen".to_string(), WatchStatus::Completed);
        config.logging.json = false;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Memory);
        assert_eq!(loaded.storage.quota_bytes, Some(1024));
        assert_eq!(loaded.status_aliases, config.status_aliases);
        assert!(!loaded.logging.json);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.storage.dir.is_none());
        assert!(config.catalog.seed_file.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_status_aliases_section() {
        let config: Config = toml::from_str(
            r#"
            [status_aliases]
            seen = "completed"
            later = "watchlist"
            "#,
        )
        .unwrap();

        assert_eq!(config.status_aliases.resolve("Seen"), Some(WatchStatus::Completed));
        assert_eq!(config.status_aliases.resolve("later"), Some(WatchStatus::Pending));
        assert_eq!(config.status_aliases.resolve("unwatched"), Some(WatchStatus::Pending));
        assert_eq!(config.status_aliases.resolve("dropped"), None);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        config.storage.quota_bytes = Some(0);
        assert!(config.validate().is_err());

        config.storage.quota_bytes = Some(10);
        assert!(config.validate().is_err()); // file backend has no quota

        config.storage.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());

        config
            .status_aliases
            .to_canonical
            .insert("watched".to_string(), WatchStatus::Watching);
        assert!(config.validate().is_err());

        config.status_aliases.to_canonical.clear();
        config
            .status_aliases
            .to_canonical
            .insert("watched".to_string(), WatchStatus::Completed);
        assert!(config.validate().is_ok());

        config.catalog.seed_file = Some(PathBuf::from("/nonexistent/catalog.json"));
        assert!(config.validate().is_err());
    }
}
