use bytes::Bytes;
use tracing::debug;

use hashpad_store::BlobStore;

use crate::error::{RouteError, RouteResult};
use crate::intent::RouteIntent;
use crate::urls::{download_path, editor_url};

pub const STATUS_OK: u16 = 200;
pub const STATUS_FOUND: u16 = 302;

/// Terminal outcome of routing one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Raw blob bytes with the headers recorded when it was stored.
    Stream {
        status: u16,
        content_type: String,
        content_length: u64,
        body: Bytes,
    },
    Redirect {
        status: u16,
        location: String,
    },
}

impl RouteOutcome {
    fn redirect(location: String) -> Self {
        Self::Redirect {
            status: STATUS_FOUND,
            location,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Stream { status, .. } | Self::Redirect { status, .. } => *status,
        }
    }
}

/// Route `path` against `store`.
///
/// A download request for an absent hash is [`RouteError::NotFound`]; there
/// is no fallback to the editor.
pub async fn resolve(
    path: &str,
    store: &dyn BlobStore,
    default_document: &str,
) -> RouteResult<RouteOutcome> {
    let intent = RouteIntent::parse(path);
    let Some(hash) = intent.canonical_hash()? else {
        debug!(path, "no hash in path, opening default document");
        return Ok(RouteOutcome::redirect(editor_url(default_document)));
    };

    if !intent.wants_download {
        debug!(path, hash = %hash.short_hex(), "redirecting to editor");
        return Ok(RouteOutcome::redirect(editor_url(&download_path(&hash, "md"))));
    }

    let blob = store.get(&hash).await?.ok_or(RouteError::NotFound(hash))?;
    debug!(hash = %hash.short_hex(), len = blob.len(), "streaming blob");
    Ok(RouteOutcome::Stream {
        status: STATUS_OK,
        content_type: blob.metadata.content_type,
        content_length: blob.data.len() as u64,
        body: blob.data,
    })
}
