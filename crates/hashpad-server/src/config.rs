use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use hashpad_doc::RendererConfig;
use hashpad_router::DEFAULT_DOCUMENT;

use crate::error::{ServerError, ServerResult};

/// Server settings, read from TOML. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `editor.html`, `homepage.md` and other assets.
    pub public_dir: PathBuf,
    /// Blob directory; blobs are kept in memory when unset.
    pub store_dir: Option<PathBuf>,
    /// Document opened when a request carries no hash.
    pub default_document: String,
    /// Origin request URIs are resolved against.
    pub base_url: String,
    /// Answer cross-origin requests to the API.
    pub allow_cors: bool,
    pub renderer: RendererConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080),
            public_dir: PathBuf::from("public"),
            store_dir: None,
            default_document: DEFAULT_DOCUMENT.to_string(),
            base_url: "http://localhost:8080/".to_string(),
            allow_cors: false,
            renderer: RendererConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that deserialize but cannot be used.
    pub fn validate(&self) -> ServerResult<()> {
        Url::parse(&self.base_url)
            .map_err(|e| ServerError::Config(format!("base_url {:?}: {e}", self.base_url)))?;
        Ok(())
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}
