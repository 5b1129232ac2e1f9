use cinelist_models::ContentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { key: String, needed: usize, quota: usize },

    #[error("Storage is unavailable")]
    Unavailable,
}

#[derive(Error, Debug)]
pub enum WatchStateError {
    /// Catalog lookup failed; entries referencing the id are still kept
    #[error("Content {0} not found in catalog")]
    NotFound(ContentId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reported as a warning alongside a successful in-memory update
    #[error("Changes were not persisted: {0}")]
    PersistenceDegraded(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WatchStateError>;
