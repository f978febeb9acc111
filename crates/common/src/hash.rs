use sha2::{Digest, Sha256};

/// Number of hex characters in a document id (SHA-256, 32 bytes).
pub const ID_HEX_LEN: usize = 64;

/// Compute the document id for a payload: lowercase hex of SHA-256.
pub fn digest_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check that a string is a well-formed document id.
/// Ids are matched case-insensitively; storage lowercases them on entry.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_HEX_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Verify that a payload matches an expected id (case-insensitive).
pub fn verify_digest(data: &[u8], expected: &str) -> bool {
    digest_hex(data) == expected.to_ascii_lowercase()
}
