//! Game Logic Module
//!
//! Selection, comparison and round bookkeeping. No I/O, no clock reads.
//!
//! ## Module Structure
//!
//! - `entity`: Character record and its vocabularies
//! - `arc`: Canonical story-arc order, aliases and chapter ranges
//! - `category`: Per-attribute comparators and tile formatting
//! - `evaluate`: Full guess evaluation
//! - `select`: Daily and infinite target selection
//! - `round`: Guess log, win/loss and streak state machine

pub mod arc;
pub mod category;
pub mod entity;
pub mod evaluate;
pub mod round;
pub mod select;

// Re-export key types
pub use category::{CategoryKey, CategoryResult, TileStatus};
pub use entity::{DevilFruitType, Entity, Gender, Haki, HakiSet};
pub use evaluate::{evaluate_guess, GuessResult};
pub use round::{DailyState, GuessOutcome, InfiniteState, RoundStatus, Stats};
pub use select::SelectError;
