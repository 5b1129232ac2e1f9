use crate::error::StorageError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Well-known keys of the persisted store
pub mod keys {
    pub const PROFILE: &str = "profile";
    pub const CATALOG: &str = "catalog";
    pub const WATCH_STATE: &str = "watch_state";

    /// Every key written by the application, cleared together on reset
    pub const ALL: [&str; 3] = [PROFILE, CATALOG, WATCH_STATE];
}

/// Durable key-value byte store.
///
/// Writes replace the whole value; there is no merge and the last writer wins.
pub trait PersistedStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::Io {
            key: dir.display().to_string(),
            source: e,
        })?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PersistedStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            debug!("Storage miss: {} (file does not exist)", key);
            return Ok(None);
        }

        std::fs::read(&path)
            .map(Some)
            .map_err(|e| StorageError::Io { key: key.to_string(), source: e })
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let io_err = |e| StorageError::Io { key: key.to_string(), source: e };

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, bytes).map_err(io_err)?;
        std::fs::rename(&temp_path, &path).map_err(io_err)?;

        debug!("Storage saved: {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io { key: key.to_string(), source: e }),
        }
    }
}

/// In-process store with an optional byte quota, in the manner of browser local storage
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail, as when storage is disabled
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn used_bytes(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl PersistedStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            warn!("Storage write rejected for {}: storage unavailable", key);
            return Err(StorageError::Unavailable);
        }

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + bytes.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(&dir.path().join("storage")).unwrap();

        assert_eq!(store.read("profile").unwrap(), None);

        store.write("profile", b"{\"name\":\"Ana\"}").unwrap();
        assert_eq!(store.read("profile").unwrap().unwrap(), b"{\"name\":\"Ana\"}".to_vec());
        assert!(store.dir().join("profile.json").exists());
        assert!(!store.dir().join("profile.json.tmp").exists());

        store.write("profile", b"{}").unwrap();
        assert_eq!(store.read("profile").unwrap().unwrap(), b"{}".to_vec());

        store.remove("profile").unwrap();
        assert_eq!(store.read("profile").unwrap(), None);
    }

    #[test]
    fn test_file_store_remove_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.remove("never_written").is_ok());
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(20);
        store.write("a", b"0123456789").unwrap();

        let err = store.write("b", b"0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 22, quota: 20, .. }));
        assert_eq!(store.read("b").unwrap(), None);

        // Overwriting a key only counts its new size
        store.write("a", b"0123456789abcdefg").unwrap();
        assert_eq!(store.used_bytes(), 18);
    }

    #[test]
    fn test_memory_store_unavailable() {
        let store = MemoryStore::new();
        store.write("k", b"v").unwrap();

        store.set_unavailable(true);
        assert!(matches!(store.write("k", b"w"), Err(StorageError::Unavailable)));
        assert_eq!(store.read("k").unwrap().unwrap(), b"v".to_vec());

        store.set_unavailable(false);
        store.write("k", b"w").unwrap();
        assert_eq!(store.read("k").unwrap().unwrap(), b"w".to_vec());
    }
}
