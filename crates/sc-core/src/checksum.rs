//! SHA-224 checksum of change script content.
//!
//! Stored in the `CHECKSUM` column of the change history table.

use sha2::{Digest, Sha224};

/// Compute the SHA-224 checksum of a string as lowercase hex
pub fn compute_checksum(s: &str) -> String {
    let mut hasher = Sha224::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            compute_checksum(""),
            "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
        );
        assert_eq!(
            compute_checksum("abc"),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
    }

    #[test]
    fn test_checksum_is_content_sensitive() {
        let a = compute_checksum("CREATE TABLE t (x INT)");
        let b = compute_checksum("CREATE TABLE t (x INT) ");
        assert_ne!(a, b);
        assert_eq!(a.len(), 56);
    }
}
