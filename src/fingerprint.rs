//! Content fingerprinting for cache keys
//!
//! A fingerprint is the full hex SHA-1 digest of a byte string. The same
//! digest function serves two unrelated purposes: naming the cache entry for
//! a script text, and change-detecting a canonicalized package manifest.
//! The two kinds of fingerprint are never compared against each other.
//!
//! Collisions are assumed impossible for the inputs this tool sees; there is
//! deliberately no collision handling anywhere downstream.

use sha1::{Digest, Sha1};

/// Number of hex characters in a fingerprint (160-bit digest)
pub const FINGERPRINT_LEN: usize = 40;

/// Hash a byte string into its hex fingerprint
///
/// Deterministic: the same input always yields the same fingerprint.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(fingerprint(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            fingerprint(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn deterministic() {
        let a = fingerprint(b"Console.WriteLine(1);");
        let b = fingerprint(b"Console.WriteLine(1);");
        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
    }

    #[test]
    fn distinct_inputs_differ() {
        assert_ne!(fingerprint(b"print 1"), fingerprint(b"print 2"));
    }
}
