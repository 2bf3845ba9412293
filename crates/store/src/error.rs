/// Errors from the asset store and history ledger.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested asset or ledger entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A filename that would resolve outside the store root.
    #[error("Invalid asset name: {0}")]
    InvalidName(String),

    /// The underlying medium rejected a read or write.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The ledger could not be encoded for writing.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
