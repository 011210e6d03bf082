use thiserror::Error;

/// Errors from the remote catalog, normalized to the two cases the rest of
/// the system distinguishes.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or payload failure; retrying the same request may succeed.
    #[error("catalog request failed: {0}")]
    Transient(String),
    /// The catalog reported that no entry exists for the requested id.
    #[error("no catalog entry for '{0}'")]
    NotFound(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transient(err.to_string())
    }
}

/// Durable-storage failure. In-memory state stays authoritative when one of
/// these surfaces.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
