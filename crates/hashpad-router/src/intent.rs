use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use hashpad_types::{ContentHash, HashEncoding};

use crate::error::{RouteError, RouteResult};

/// Hex first, so a 64-char hex run is not cut down to a 43-char base64 match
/// starting at the same position.
static HASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9A-Fa-f]{64}|[A-Za-z0-9_-]{43}").expect("hash pattern is a valid regex")
});

/// Any path containing this substring asks for the raw blob.
pub const DOWNLOAD_KEYWORD: &str = "download";

/// A hash-shaped substring found in a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashMatch {
    pub text: String,
    pub encoding: HashEncoding,
}

/// What a request path asks for, before touching the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteIntent {
    pub hash: Option<HashMatch>,
    pub wants_download: bool,
}

impl RouteIntent {
    /// Scan `path` for the first hash-shaped substring.
    pub fn parse(path: &str) -> Self {
        let hash = HASH_PATTERN.find(path).and_then(|m| {
            HashEncoding::from_len(m.len()).map(|encoding| HashMatch {
                text: m.as_str().to_string(),
                encoding,
            })
        });
        Self {
            hash,
            wants_download: path.contains(DOWNLOAD_KEYWORD),
        }
    }

    /// The matched hash decoded to its store key.
    pub fn canonical_hash(&self) -> RouteResult<Option<ContentHash>> {
        let Some(found) = &self.hash else {
            return Ok(None);
        };
        let hash = match found.encoding {
            HashEncoding::Hex => ContentHash::from_hex(&found.text)?,
            HashEncoding::Base64Url => ContentHash::from_base64url(&found.text)?,
        };
        Ok(Some(hash))
    }
}

/// Path component of a request URI, resolved against `base_url`.
///
/// Only the path is routed; query strings and fragments never contribute a
/// hash or a download intent.
pub fn request_path(uri: &str, base_url: &str) -> RouteResult<String> {
    let invalid = |reason: String| RouteError::InvalidUri {
        uri: uri.to_string(),
        reason,
    };
    let base = Url::parse(base_url).map_err(|e| invalid(format!("bad base url: {e}")))?;
    let url = base.join(uri).map_err(|e| invalid(e.to_string()))?;
    Ok(url.path().to_string())
}
