//! Truncated SHA-256 fingerprint of the session key, logged at startup so
//! operators can tell which key is active without exposing it.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Hex-encode the first eight bytes of the SHA-256 digest of the key's
/// signing half.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use community_issues::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}
