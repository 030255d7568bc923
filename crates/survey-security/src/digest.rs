use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
#[cfg(test)]
pub const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
