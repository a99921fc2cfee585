//! Round State Machine
//!
//! Tracks guesses for one daily puzzle or one infinite round:
//! duplicate prevention, win/loss detection, and the streak and total
//! counters. States only move forward:
//!
//! ```text
//! Active ──correct guess──▶ Won
//!    │
//!    └──6th wrong guess───▶ Lost
//! ```
//!
//! Storage is not touched here; callers load a state, apply a guess and
//! save the result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::evaluate::GuessResult;
use crate::MAX_GUESSES;

/// Where a round stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Guesses remain and none was correct
    Active,
    /// A guess was correct
    Won,
    /// Out of guesses
    Lost,
}

/// What happened when a guess was submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Entity already guessed this round; nothing changed.
    Duplicate,
    /// Round already over; nothing changed.
    AlreadyFinished,
    /// Guess recorded, round still active.
    Continue,
    /// Guess recorded and it was correct.
    Won,
    /// Guess recorded and it used the last attempt.
    Lost,
}

impl GuessOutcome {
    /// True if the round state was modified.
    pub fn is_accepted(self) -> bool {
        !matches!(self, GuessOutcome::Duplicate | GuessOutcome::AlreadyFinished)
    }
}

// =============================================================================
// GUESS LOG
// =============================================================================

/// Guess history shared by both round kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessLog {
    /// Accepted guesses in submission order
    pub guesses: Vec<GuessResult>,
    /// Ids already guessed
    pub guessed_ids: BTreeSet<String>,
    /// Round is over
    pub is_finished: bool,
    /// Round was won
    pub is_won: bool,
}

impl GuessLog {
    /// Current status.
    pub fn status(&self) -> RoundStatus {
        match (self.is_finished, self.is_won) {
            (_, true) => RoundStatus::Won,
            (true, false) => RoundStatus::Lost,
            (false, false) => RoundStatus::Active,
        }
    }

    /// Check if an entity was already guessed.
    pub fn contains(&self, entity_id: &str) -> bool {
        self.guessed_ids.contains(entity_id)
    }

    /// Guesses left before the round is lost.
    pub fn remaining(&self) -> usize {
        MAX_GUESSES.saturating_sub(self.guesses.len())
    }

    /// Record a guess and settle the win/loss flags.
    fn record(&mut self, guess: GuessResult) -> GuessOutcome {
        if self.is_finished {
            return GuessOutcome::AlreadyFinished;
        }
        if self.contains(&guess.entity_id) {
            return GuessOutcome::Duplicate;
        }

        let is_correct = guess.is_correct;
        self.guessed_ids.insert(guess.entity_id.clone());
        self.guesses.push(guess);

        if is_correct {
            self.is_won = true;
            self.is_finished = true;
            GuessOutcome::Won
        } else if self.guesses.len() >= MAX_GUESSES {
            self.is_finished = true;
            GuessOutcome::Lost
        } else {
            GuessOutcome::Continue
        }
    }
}

// =============================================================================
// STATS
// =============================================================================

/// Cumulative counters across rounds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Consecutive daily wins
    pub daily_streak: u32,
    /// Best daily streak
    pub daily_max_streak: u32,
    /// Infinite rounds won
    pub infinite_total_wins: u32,
    /// Infinite rounds finished
    pub infinite_total_games: u32,
}

// =============================================================================
// DAILY
// =============================================================================

/// State of one daily puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyState {
    /// Puzzle date, `YYYY-MM-DD`
    pub date: String,
    /// Guess history
    #[serde(flatten)]
    pub log: GuessLog,
    /// Streak including this puzzle
    pub streak: u32,
    /// Best streak so far
    pub max_streak: u32,
}

impl DailyState {
    /// Fresh puzzle, carrying the streak from the last known stats.
    pub fn new(date: impl Into<String>, stats: &Stats) -> Self {
        Self {
            date: date.into(),
            log: GuessLog::default(),
            streak: stats.daily_streak,
            max_streak: stats.daily_max_streak,
        }
    }

    /// Apply an evaluated guess.
    pub fn apply_guess(&mut self, guess: GuessResult) -> GuessOutcome {
        let outcome = self.log.record(guess);
        match outcome {
            GuessOutcome::Won => {
                self.streak += 1;
                self.max_streak = self.max_streak.max(self.streak);
            }
            GuessOutcome::Lost => self.streak = 0,
            _ => {}
        }
        outcome
    }

    /// Current status.
    pub fn status(&self) -> RoundStatus {
        self.log.status()
    }
}

// =============================================================================
// INFINITE
// =============================================================================

/// State of the current infinite round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfiniteState {
    /// Round identifier (also the selection seed source)
    pub round_id: String,
    /// Seed derived from the round id
    pub seed: u32,
    /// Guess history
    #[serde(flatten)]
    pub log: GuessLog,
    /// Rounds won, all time
    pub total_wins: u32,
    /// Rounds finished, all time
    pub total_games: u32,
}

impl InfiniteState {
    /// Fresh round with the given cumulative totals.
    pub fn new(round_id: impl Into<String>, total_wins: u32, total_games: u32) -> Self {
        let round_id = round_id.into();
        Self {
            seed: crate::core::hash::seed_from_str(&round_id),
            round_id,
            log: GuessLog::default(),
            total_wins,
            total_games,
        }
    }

    /// Start the next round, keeping cumulative totals.
    pub fn next_round(&self, round_id: impl Into<String>) -> Self {
        Self::new(round_id, self.total_wins, self.total_games)
    }

    /// Apply an evaluated guess.
    pub fn apply_guess(&mut self, guess: GuessResult) -> GuessOutcome {
        let outcome = self.log.record(guess);
        match outcome {
            GuessOutcome::Won => {
                self.total_wins += 1;
                self.total_games += 1;
            }
            GuessOutcome::Lost => self.total_games += 1,
            _ => {}
        }
        outcome
    }

    /// Current status.
    pub fn status(&self) -> RoundStatus {
        self.log.status()
    }
}

// =============================================================================
// TESTS
// =============================================================================
