//! Error types for the owned-item store.

/// Errors from a [`KeyValueStorage`](crate::KeyValueStorage) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by owned-item mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("index {index} out of range for {len} item(s)")]
    Index { index: usize, len: usize },

    #[error("Release failed. {value} is not a prime number.")]
    NotPrime { value: u64 },

    #[error("Release failed. No value could be drawn.")]
    NoCandidate,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this is a release validation failure (as opposed to a bad
    /// index or a storage problem).
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::NotPrime { .. } | StoreError::NoCandidate)
    }
}
