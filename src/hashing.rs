//! Content identity for deduplication.

use sha2::{Digest, Sha256};

/// SHA-256 of the full byte content, as lowercase hex.
///
/// Byte-identical files yield the identical digest regardless of path or
/// name; the digest is the sole dedup key and record primary key.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
