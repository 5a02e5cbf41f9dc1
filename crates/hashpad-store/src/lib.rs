//! Content-addressed blob storage for Hashpad.
//!
//! Documents, exported pages, and uploads are all stored as immutable blobs
//! keyed by the [`ContentHash`](hashpad_types::ContentHash) of their bytes.
//! The store never interprets blob contents; it only carries the metadata the
//! writer attached (content type, original file name, and so on) so the
//! download route can reproduce the right headers.
//!
//! # Storage Backends
//!
//! All backends implement the async [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- directory of blobs with JSON metadata sidecars
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written; the first write of a byte sequence
//!    fixes its metadata.
//! 2. Metadata is not part of the hash.
//! 3. Concurrent reads are always safe.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use blob::{BlobMetadata, StoredBlob, HTML_CONTENT_TYPE, MARKDOWN_CONTENT_TYPE, OCTET_STREAM};
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
