use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use hashpad_types::ContentHash;

use crate::blob::{BlobMetadata, StoredBlob};
use crate::error::StoreResult;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock`;
/// `Bytes` makes reads cheap clones.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, StoredBlob>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(StoredBlob::len)
            .sum()
    }

    /// Return a sorted list of all hashes in the store.
    pub fn all_hashes(&self) -> Vec<ContentHash> {
        let map = self.blobs.read().expect("lock poisoned");
        let mut hashes: Vec<ContentHash> = map.keys().copied().collect();
        hashes.sort();
        hashes
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, hash: &ContentHash) -> StoreResult<Option<StoredBlob>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(hash).cloned())
    }

    async fn put(&self, data: Bytes, metadata: BlobMetadata) -> StoreResult<ContentHash> {
        let blob = StoredBlob::new(data, metadata);
        let hash = blob.hash;
        let mut map = self.blobs.write().expect("lock poisoned");
        map.entry(hash).or_insert(blob);
        Ok(hash)
    }

    async fn exists(&self, hash: &ContentHash) -> StoreResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(hash))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
