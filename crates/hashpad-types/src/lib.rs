//! Foundation types for Hashpad.
//!
//! Every document Hashpad serves is an immutable blob keyed by its
//! [`ContentHash`]. This crate owns the hash itself and the two textual forms
//! it travels in:
//!
//! - 64-character lowercase hex (the canonical store key)
//! - 43-character URL-safe base64 without padding (short links)
//!
//! Both forms of the same digest decode to the same [`ContentHash`].

pub mod error;
pub mod hash;

pub use error::TypeError;
pub use hash::{ContentHash, HashEncoding, BASE64_LEN, HASH_LEN, HEX_LEN};
