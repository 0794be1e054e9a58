//! Domain-Separated Hashing
//!
//! SHA-256 wrapper used for:
//! - Hand commitments (sealed hands)
//! - Short fingerprints of identities in logs
//!
//! Every hash starts with a domain separator so a digest computed for
//! one purpose can never be confused with a digest for another.

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// Incremental hasher with a domain separator.
///
/// Order of updates is part of the digest; callers must feed fields in
/// a fixed order.
pub struct DomainHasher {
    hasher: Sha256,
}

impl DomainHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a 16-byte identifier.
    #[inline]
    pub fn update_id(&mut self, id: &[u8; 16]) {
        self.hasher.update(id);
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> Digest32 {
        self.hasher.finalize().into()
    }
}

/// First four bytes of a byte string as hex, for log lines.
pub fn short_hex(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(4)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let make_hash = || {
            let mut hasher = DomainHasher::new(b"test");
            hasher.update_u8(2);
            hasher.update_bytes(b"payload");
            hasher.update_id(&[7; 16]);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = DomainHasher::new(b"test");
            h.update_u8(1);
            h.update_u8(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = DomainHasher::new(b"test");
            h.update_u8(2);
            h.update_u8(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let data = [1u8, 2, 3, 4];

        let digest = |domain: &[u8]| {
            let mut h = DomainHasher::new(domain);
            h.update_bytes(&data);
            h.finalize()
        };

        assert_ne!(digest(b"DOMAIN_A"), digest(b"DOMAIN_B"));
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(short_hex(&[0xab, 0xcd, 0xef, 0x01, 0x23]), "abcdef01");
        assert_eq!(short_hex(&[0x0f]), "0f");
    }
}
