use std::sync::Arc;

use hashpad_doc::Renderer;
use hashpad_store::BlobStore;

/// Shared, read-mostly state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub renderer: Arc<Renderer>,
    pub default_document: Arc<str>,
    /// Origin request URIs are resolved against.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn BlobStore>,
        renderer: Renderer,
        default_document: &str,
        base_url: &str,
    ) -> Self {
        Self {
            store,
            renderer: Arc::new(renderer),
            default_document: Arc::from(default_document),
            base_url: Arc::from(base_url),
        }
    }
}
