//! Deterministic Random Number Generator
//!
//! Uses the Mulberry32 algorithm: a 32-bit Weyl sequence passed through
//! multiply/xor-shift mixing rounds. Given the same seed, produces an
//! identical sequence on all platforms.

use serde::{Deserialize, Serialize};

/// Odd Weyl increment added to the state on every draw.
const WEYL_INCREMENT: u32 = 0x6D2B_79F5;

/// 2^32 as a float, used to normalize draws into [0, 1).
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic PRNG using the Mulberry32 algorithm.
///
/// # Determinism Guarantee
///
/// The output is a pure function of the initial seed and the number of
/// draws taken. No entropy is ever mixed in.
///
/// # Example
///
/// ```
/// use onepiecedle::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(42);
/// assert_eq!(rng.next_u32(), 2581720956); // Always the same!
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u32,
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generate the next 32-bit random value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(WEYL_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate a float in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Generate an index in [0, len) as `floor(next_f64() * len)`.
    ///
    /// Returns 0 when `len` is 0 (the draw is still consumed).
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        let r = self.next_f64();
        if len == 0 {
            return 0;
        }
        // r < 1, so the product is strictly below len
        ((r * len as f64).floor() as usize).min(len - 1)
    }

    /// Select a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_index(slice.len());
            Some(&slice[idx])
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: u32) {
        self.state = state;
    }
}

// =============================================================================
// TESTS
// =============================================================================
