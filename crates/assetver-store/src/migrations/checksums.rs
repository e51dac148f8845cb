use sha2::{Digest, Sha256};

/// Hex SHA256 of migration SQL, recorded when applied and verified after
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
