//! # OnePiecedle
//!
//! Guess evaluation and deterministic selection engine for a daily
//! character-guessing game set in the One Piece universe.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ONEPIECEDLE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Mulberry32 PRNG                           │
//! │  ├── hash.rs     - String seeds and storage checksums        │
//! │  └── clock.rs    - Injectable "now"                          │
//! │                                                              │
//! │  game/           - Game logic (pure)                         │
//! │  ├── entity.rs   - Character record                          │
//! │  ├── arc.rs      - Story-arc order and chapter ranges        │
//! │  ├── category.rs - Per-attribute comparators                 │
//! │  ├── evaluate.rs - Guess evaluation                          │
//! │  ├── select.rs   - Daily / infinite target selection         │
//! │  └── round.rs    - Round state machine                       │
//! │                                                              │
//! │  session/        - Persistence (I/O)                         │
//! │  ├── store.rs    - Storage schema, memory and file stores    │
//! │  └── manager.rs  - Guess submission over a store             │
//! │                                                              │
//! │  roster.rs       - Character data loading and validation     │
//! │  search.rs       - Name / alias autocomplete                 │
//! │  share.rs        - Emoji share text                          │
//! │  config.rs       - Game configuration                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules never read the clock or the
//! environment:
//! - Selection randomness comes from a seeded Mulberry32 stream
//! - Seeds come from the UTC date string or the round id
//! - Lookup tables are immutable
//!
//! Given the same roster order and date, every player gets the same
//! daily answer on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod roster;
pub mod search;
pub mod session;
pub mod share;

// Re-export commonly used types
pub use config::GameConfig;
pub use crate::core::rng::DeterministicRng;
pub use game::entity::Entity;
pub use game::evaluate::{evaluate_guess, GuessResult};
pub use game::round::{DailyState, GuessOutcome, InfiniteState};
pub use roster::Roster;
pub use session::{GameSession, JsonFileStore, MemoryStore, SessionStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game name used in share text
pub const GAME_NAME: &str = "OnePiecedle";

/// Guesses allowed per round
pub const MAX_GUESSES: usize = 6;
