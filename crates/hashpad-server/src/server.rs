use std::sync::Arc;

use tokio::net::TcpListener;

use hashpad_doc::Renderer;
use hashpad_store::{BlobStore, FsBlobStore, InMemoryBlobStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Hashpad HTTP server.
pub struct HashpadServer {
    config: ServerConfig,
    state: AppState,
}

impl HashpadServer {
    /// Open the configured store: a directory when `store_dir` is set,
    /// memory otherwise.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let store: Arc<dyn BlobStore> = match &config.store_dir {
            Some(dir) => Arc::new(FsBlobStore::open(dir)?),
            None => Arc::new(InMemoryBlobStore::new()),
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn BlobStore>) -> Self {
        let renderer = Renderer::new(config.renderer.clone());
        let state = AppState::new(
            store,
            renderer,
            &config.default_document,
            &config.base_url,
        );
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            public_dir = %self.config.public_dir.display(),
            persistent = self.config.store_dir.is_some(),
            "Hashpad server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
