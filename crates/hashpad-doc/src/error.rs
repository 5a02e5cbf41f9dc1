use thiserror::Error;

/// Errors from rendering or serializing documents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    /// A node that is neither text nor an element. `path` lists child
    /// indices from the root, e.g. `/2/0`.
    #[error("malformed node at {path}")]
    MalformedNode { path: String },

    /// The container the document is rendered into is missing.
    #[error("missing root element <{0}>")]
    MissingRoot(String),
}

pub type DocResult<T> = Result<T, DocError>;
