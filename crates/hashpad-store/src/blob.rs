use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hashpad_types::ContentHash;

/// Content type for serialized Markdown documents.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
/// Content type for exported standalone pages.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
/// Fallback when the writer did not say what the bytes are.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Descriptive metadata attached to a blob at write time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// MIME type replayed as `Content-Type` on download.
    pub content_type: String,
    /// Original file name, for uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size the uploader reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last-modified time of the uploaded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Path relative to the directory the user picked, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

impl BlobMetadata {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            name: None,
            size: None,
            last_modified: None,
            relative_path: None,
        }
    }

    pub fn markdown() -> Self {
        Self::new(MARKDOWN_CONTENT_TYPE)
    }

    pub fn html() -> Self {
        Self::new(HTML_CONTENT_TYPE)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }
}

impl Default for BlobMetadata {
    fn default() -> Self {
        Self::new(OCTET_STREAM)
    }
}

/// A blob as read back from a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    pub hash: ContentHash,
    pub data: Bytes,
    pub metadata: BlobMetadata,
}

impl StoredBlob {
    pub fn new(data: impl Into<Bytes>, metadata: BlobMetadata) -> Self {
        let data = data.into();
        Self {
            hash: ContentHash::digest(&data),
            data,
            metadata,
        }
    }

    /// Byte length, replayed as `Content-Length`.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn content_type(&self) -> &str {
        &self.metadata.content_type
    }
}
