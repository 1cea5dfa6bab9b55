//! Salted password hashing
//!
//! SHA-256 over password || salt, hex-encoded. The scheme is fixed by the
//! existing administrator records; the salt is what defeats precomputed
//! dictionary attacks across accounts.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded digest of a password and salt.
///
/// Pure and deterministic: the same inputs always yield the same digest.
pub fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a password against a stored digest.
///
/// The comparison is constant-time so that the match prefix length does
/// not leak through response timing.
pub fn verify(password: &str, salt: &str, expected_digest: &str) -> bool {
    constant_time_eq(digest(password, salt).as_bytes(), expected_digest.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("admin123", "salt123"), digest("admin123", "salt123"));
    }

    #[test]
    fn test_digest_differs_by_password_and_salt() {
        assert_ne!(digest("admin123", "salt123"), digest("admin124", "salt123"));
        assert_ne!(digest("admin123", "salt123"), digest("admin123", "salt124"));
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let d = digest("admin123", "salt123");
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify() {
        let d = digest("admin123", "salt123");
        assert!(verify("admin123", "salt123", &d));
        assert!(!verify("wrongpass", "salt123", &d));
        assert!(!verify("admin123", "salt456", &d));
        assert!(!verify("admin123", "salt123", "not-a-digest"));
    }
}
