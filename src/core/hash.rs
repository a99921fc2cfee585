//! Seed Derivation and State Hashing
//!
//! Provides:
//! - The polynomial string hash that turns dates and round ids into seeds
//! - SHA-256 integrity digests for persisted session state

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Derive a selection seed from a string.
///
/// Classic `acc * 31 + unit` polynomial hash over UTF-16 code units,
/// truncated to a signed 32-bit accumulator, then made non-negative.
/// `i32::MIN` maps to `2147483648`, which is why the result is a `u32`.
///
/// Collisions are possible and tolerated.
pub fn seed_from_str(s: &str) -> u32 {
    let acc = s
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
    acc.unsigned_abs()
}

/// Deterministic hasher for persisted state.
///
/// Wraps SHA-256 with a domain separator. Order of updates is critical
/// for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for the session storage schema.
    pub fn for_storage(version: u32) -> Self {
        let mut hasher = Self::new(b"ONEPIECEDLE_STORAGE");
        hasher.update_u32(version);
        hasher
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }

    /// Finalize and return the hash as lowercase hex.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

// =============================================================================
// TESTS
// =============================================================================
