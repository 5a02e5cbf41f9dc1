use hashpad_store::StoreError;
use hashpad_types::{ContentHash, TypeError};

/// Errors from routing a request.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The path asked for a download of a blob the store does not hold.
    #[error("no blob stored under {0}")]
    NotFound(ContentHash),

    /// A hash-shaped substring did not decode.
    #[error("invalid hash in path: {0}")]
    InvalidHash(#[from] TypeError),

    /// The request URI could not be parsed.
    #[error("invalid request uri {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
