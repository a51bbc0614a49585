use base64::Engine;
use sha2::{Digest, Sha256};

/// SHA-256 of the raw document bytes, base64 (standard alphabet, padded).
///
/// Used by storage to recognize re-uploads of the same file.
pub fn compute_content_hash(content: &[u8]) -> String {
    let hash = Sha256::digest(content);
    base64::engine::general_purpose::STANDARD.encode(hash)
}
