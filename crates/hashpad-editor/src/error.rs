use hashpad_doc::DocError;
use hashpad_store::StoreError;

/// Failures raised by the host environment.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Fetching the document bytes failed.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The host cannot perform the requested operation.
    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from editor operations.
///
/// None of these are retried; an action that fails leaves the tree as it was
/// before the failing step.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Doc(#[from] DocError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The current location or document reference is not a usable URL.
    #[error("invalid reference {reference:?}: {reason}")]
    InvalidReference { reference: String, reason: String },
}

/// Result alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
