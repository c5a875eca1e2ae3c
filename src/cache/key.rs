// View cache key derivation and hashing utilities

use sha2::{Digest, Sha256};

use crate::view::{ViewData, ViewValue};

/// Number of digest bytes kept for fingerprints and file names (128 bits)
pub const HASH_BYTES: usize = 16;

/// Hex-encoded 128-bit SHA-256 prefix of `input`
pub fn hash_hex(input: &[u8]) -> String {
    let digest = Sha256::digest(input);
    hex::encode(&digest[..HASH_BYTES])
}

/// Stable fingerprint of the serializable part of the render data
///
/// Helper entries carry live function references and are skipped. The
/// remaining entries are serialized in key order, so two maps holding the same
/// values always fingerprint identically regardless of insertion order.
pub fn data_fingerprint(data: &ViewData) -> String {
    let normalized: serde_json::Map<String, serde_json::Value> = data
        .iter()
        .filter_map(|(name, value)| match value {
            ViewValue::Data(v) => Some((name.clone(), v.clone())),
            ViewValue::Helper(_) => None,
        })
        .collect();

    // A map of plain JSON values always serializes
    let bytes = serde_json::to_vec(&normalized).unwrap_or_default();
    hash_hex(&bytes)
}

/// Cache key for one render
///
/// # Format
/// `"{controller}:{page}:{fingerprint}"`, with `controller` and `page`
/// percent-encoded so a `:` inside either can never shift the field boundary.
pub fn generate_key(controller: &str, page: &str, data: &ViewData) -> String {
    format!(
        "{}:{}:{}",
        urlencoding::encode(controller),
        urlencoding::encode(page),
        data_fingerprint(data)
    )
}
