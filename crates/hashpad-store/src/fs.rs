use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use hashpad_types::ContentHash;

use crate::blob::{BlobMetadata, StoredBlob};
use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Directory-backed blob store.
///
/// Layout: `<root>/<first two hex chars>/<hex>` holds the bytes and
/// `<hex>.json` next to it holds the [`BlobMetadata`]. Files are written to a
/// temporary file in the same directory and renamed into place, metadata
/// first, so a present data file always has its sidecar.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        let hex = hash.to_hex();
        self.root.join(&hex[..2]).join(hex)
    }

    fn metadata_path(&self, hash: &ContentHash) -> PathBuf {
        self.blob_path(hash).with_extension("json")
    }

    async fn read_metadata(&self, hash: &ContentHash) -> BlobMetadata {
        let path = self.metadata_path(hash);
        let parsed = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        parsed.unwrap_or_else(|e| {
            warn!("unreadable metadata sidecar {:?}: {}", path, e);
            BlobMetadata::default()
        })
    }
}

/// Write `data` to `path` through a temp file in the same directory.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "blob path has no parent"))?;
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, hash: &ContentHash) -> StoreResult<Option<StoredBlob>> {
        let data = match tokio::fs::read(self.blob_path(hash)).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !hash.verify(&data) {
            return Err(StoreError::CorruptBlob {
                hash: *hash,
                reason: "content does not match its hash".into(),
            });
        }
        let metadata = self.read_metadata(hash).await;
        Ok(Some(StoredBlob {
            hash: *hash,
            data: Bytes::from(data),
            metadata,
        }))
    }

    async fn put(&self, data: Bytes, metadata: BlobMetadata) -> StoreResult<ContentHash> {
        let hash = ContentHash::digest(&data);
        let blob_path = self.blob_path(&hash);
        if tokio::fs::try_exists(&blob_path).await? {
            debug!(hash = %hash.short_hex(), "blob already stored");
            return Ok(hash);
        }

        let sidecar = serde_json::to_vec(&metadata)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let metadata_path = self.metadata_path(&hash);
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            write_atomic(&metadata_path, &sidecar)?;
            write_atomic(&blob_path, &data)
        })
        .await
        .map_err(io::Error::other)??;

        debug!(hash = %hash.short_hex(), "blob written");
        Ok(hash)
    }

    async fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(tokio::fs::try_exists(self.blob_path(hash)).await?)
    }
}
