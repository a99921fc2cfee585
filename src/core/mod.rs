//! Core deterministic primitives.
//!
//! Everything here is a pure function of its inputs, except the clock,
//! which exists so that callers can inject "now".

pub mod clock;
pub mod hash;
pub mod rng;

// Re-export core types
pub use clock::{Clock, FixedClock, SystemClock};
pub use hash::{seed_from_str, StateHasher};
pub use rng::DeterministicRng;
