use hashpad_types::ContentHash;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Stored bytes no longer hash to their key.
    #[error("corrupt blob {hash}: {reason}")]
    CorruptBlob { hash: ContentHash, reason: String },

    /// Metadata serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
