//! Hash-keyed request routing for Hashpad.
//!
//! Every inbound path is scanned for a content hash, in either of the two
//! textual forms [`ContentHash`](hashpad_types::ContentHash) supports. The
//! router then picks one of three terminal outcomes:
//!
//! | Path | Outcome |
//! |------|---------|
//! | no hash | redirect to the editor with the default document |
//! | hash, contains `download` | stream the stored blob, or [`RouteError::NotFound`] |
//! | hash, anything else | redirect to the editor with `/download/<hex>.md` |
//!
//! Routing is stateless; the only collaborator is a
//! [`BlobStore`](hashpad_store::BlobStore) read.

pub mod error;
pub mod intent;
pub mod resolve;
pub mod urls;

pub use error::{RouteError, RouteResult};
pub use intent::{request_path, HashMatch, RouteIntent, DOWNLOAD_KEYWORD};
pub use resolve::{resolve, RouteOutcome, STATUS_FOUND, STATUS_OK};
pub use urls::{download_path, editor_url, extension_for, DEFAULT_DOCUMENT, EDITOR_PAGE};
