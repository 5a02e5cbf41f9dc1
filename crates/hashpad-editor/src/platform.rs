use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

use crate::error::PlatformError;

/// How a navigation updates the location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Replace the address in history without reloading.
    Push,
    /// Load the target as a new page.
    Load,
}

/// Visible size of the editing surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A file the user picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub data: Bytes,
    /// MIME type as reported by the host; may be empty.
    pub content_type: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub relative_path: Option<String>,
}

/// Host environment the controller runs in.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Absolute URL of the page hosting the editor.
    fn current_reference(&self) -> String;

    /// Fetch the bytes behind `url`.
    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes, PlatformError>;

    fn navigate(&self, url: &Url, how: Navigation) -> Result<(), PlatformError>;

    /// Show `value` to the user under `message`, the way a browser prompt does.
    fn prompt_user(&self, message: &str, value: &str);

    /// Ask the user for files. An empty list means the picker was dismissed.
    async fn select_files(&self) -> Result<Vec<SelectedFile>, PlatformError>;

    fn viewport(&self) -> Option<Viewport> {
        None
    }
}
