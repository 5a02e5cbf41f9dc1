use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Digest length in bytes.
pub const HASH_LEN: usize = 32;
/// Length of the canonical hex form.
pub const HEX_LEN: usize = 64;
/// Length of the URL-safe base64 form (no padding).
pub const BASE64_LEN: usize = 43;

/// Domain tag mixed into every blob digest.
const BLOB_DOMAIN: &str = "hashpad-blob-v1";

/// URL-safe decoder that tolerates stray trailing bits and optional padding,
/// so any 43-character candidate lifted out of a URL decodes to 32 bytes.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Textual encoding a hash arrived in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashEncoding {
    /// 43-character URL-safe base64 without padding.
    Base64Url,
    /// 64-character hex, either case.
    Hex,
}

impl HashEncoding {
    /// Encoding implied by a candidate's length, if any.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            HEX_LEN => Some(Self::Hex),
            BASE64_LEN => Some(Self::Base64Url),
            _ => None,
        }
    }
}

impl fmt::Display for HashEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64Url => write!(f, "base64url"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

/// Content-addressed identifier for a stored blob.
///
/// A `ContentHash` is the domain-separated BLAKE3 digest of a blob's bytes.
/// Identical bytes always produce the same hash, so a hash is both the
/// primary key into the store and a verifiable fingerprint of the content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    /// Hash a blob's bytes.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(BLOB_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Self(*hasher.finalize().as_bytes())
    }

    /// Wrap a pre-computed digest.
    pub fn from_raw(hash: [u8; HASH_LEN]) -> Self {
        Self(hash)
    }

    /// Verify that `data` hashes to this value.
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::digest(data) == *self
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Canonical lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// 43-character URL-safe base64 form.
    pub fn to_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parse from hex (either case).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse from URL-safe base64. Trailing bits beyond the digest are ignored.
    pub fn from_base64url(s: &str) -> Result<Self, TypeError> {
        let bytes = URL_SAFE_LENIENT
            .decode(s)
            .map_err(|e| TypeError::InvalidBase64(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse either textual form, picking the decoder from the length.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        match HashEncoding::from_len(s.len()) {
            Some(HashEncoding::Hex) => Self::from_hex(s),
            Some(HashEncoding::Base64Url) => Self::from_base64url(s),
            None => Err(TypeError::Unrecognized(s.to_string())),
        }
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; HASH_LEN] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: HASH_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ContentHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; HASH_LEN]> for ContentHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
