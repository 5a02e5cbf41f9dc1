use async_trait::async_trait;
use bytes::Bytes;

use hashpad_types::ContentHash;

use crate::blob::{BlobMetadata, StoredBlob};
use crate::error::StoreResult;

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - Blobs are immutable once written. The same bytes always produce the
///   same hash, and a second write of them is a no-op.
/// - Concurrent reads are always safe.
/// - The store never interprets blob contents.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a blob by hash.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    async fn get(&self, hash: &ContentHash) -> StoreResult<Option<StoredBlob>>;

    /// Write a blob and return its hash.
    ///
    /// If the bytes are already stored this is a no-op and the existing
    /// metadata is kept.
    async fn put(&self, data: Bytes, metadata: BlobMetadata) -> StoreResult<ContentHash>;

    /// Check whether a blob exists.
    async fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        Ok(self.get(hash).await?.is_some())
    }
}
