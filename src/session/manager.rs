//! Game Session
//!
//! Ties selection, evaluation and the round state machine to a store and
//! a clock. Each operation loads the schema, applies one change and saves
//! it back; the store is the only shared state.

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::clock::Clock;
use crate::game::evaluate::evaluate_guess;
use crate::game::entity::Entity;
use crate::game::round::{DailyState, GuessOutcome, InfiniteState, Stats};
use crate::game::select::{
    daily_game_number_str, new_round_id, select_daily, select_infinite, time_until_reset, utc_date_string,
    SelectError,
};
use crate::roster::Roster;
use crate::search;
use crate::session::store::{SessionStore, StoreError};
use crate::share::{format_share_text, ShareMode};

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Guess id is not in the roster.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Target selection failed.
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Store failed to persist.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A player's session over a store.
pub struct GameSession<S: SessionStore, C: Clock> {
    store: S,
    clock: C,
    config: GameConfig,
}

impl<S: SessionStore, C: Clock> GameSession<S, C> {
    /// Session with default configuration.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, GameConfig::default())
    }

    /// Session with explicit configuration.
    pub fn with_config(store: S, clock: C, config: GameConfig) -> Self {
        Self { store, clock, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Today's puzzle date (UTC).
    pub fn today(&self) -> String {
        utc_date_string(self.clock.now())
    }

    /// Time left until the next daily puzzle.
    pub fn time_until_reset(&self) -> chrono::Duration {
        time_until_reset(self.clock.now())
    }

    // =========================================================================
    // DAILY
    // =========================================================================

    /// State for a date; fresh if never played.
    pub fn daily_state(&self, date: &str) -> DailyState {
        self.store.load().daily_or_new(date)
    }

    /// Check if an entity was already guessed on a date.
    pub fn is_daily_duplicate(&self, entity_id: &str, date: &str) -> bool {
        self.daily_state(date).log.contains(entity_id)
    }

    /// Answer for a date.
    pub fn daily_target<'r>(&self, roster: &'r Roster, date: &str) -> Result<&'r Entity, SessionError> {
        Ok(select_daily(roster.entities(), date)?)
    }

    /// Evaluate and record a daily guess.
    ///
    /// Rejected guesses (duplicate or finished round) leave the store untouched.
    pub fn submit_daily_guess(
        &self,
        roster: &Roster,
        guess_id: &str,
        date: &str,
    ) -> Result<(DailyState, GuessOutcome), SessionError> {
        let guess = find_guess(roster, guess_id)?;
        let target = self.daily_target(roster, date)?;

        let mut schema = self.store.load();
        let mut state = schema.daily_or_new(date);
        let outcome = state.apply_guess(evaluate_guess(guess, target));

        if !outcome.is_accepted() {
            debug!("Daily guess {} on {} rejected: {:?}", guess_id, date, outcome);
            return Ok((state, outcome));
        }

        schema.record_daily(state.clone());
        self.store.save(&schema)?;

        match outcome {
            GuessOutcome::Won => info!("Daily {} won in {} (streak {})", date, state.log.guesses.len(), state.streak),
            GuessOutcome::Lost => info!("Daily {} lost", date),
            _ => debug!("Daily {} guess {} recorded", date, guess_id),
        }
        Ok((state, outcome))
    }

    /// Share text for a date's puzzle.
    pub fn share_daily(&self, date: &str) -> Result<String, SessionError> {
        let game_number = daily_game_number_str(date)?;
        let state = self.daily_state(date);
        Ok(format_share_text(
            &state.log.guesses,
            ShareMode::Daily { game_number },
            state.log.is_won,
            &self.config,
        ))
    }

    // =========================================================================
    // INFINITE
    // =========================================================================

    /// Current infinite round, starting one if none exists yet.
    pub fn infinite_state(&self) -> Result<InfiniteState, SessionError> {
        let state = self.store.load().infinite;
        if state.round_id.is_empty() {
            return self.start_new_infinite_round();
        }
        Ok(state)
    }

    /// Replace the infinite round, keeping cumulative totals.
    pub fn start_new_infinite_round(&self) -> Result<InfiniteState, SessionError> {
        let mut schema = self.store.load();
        let round_id = new_round_id(&self.clock);
        let state = schema.infinite.next_round(round_id);

        schema.record_infinite(state.clone());
        self.store.save(&schema)?;
        info!("Started infinite round {}", state.round_id);
        Ok(state)
    }

    /// Answer for the current infinite round.
    pub fn infinite_target<'r>(&self, roster: &'r Roster) -> Result<&'r Entity, SessionError> {
        let state = self.infinite_state()?;
        Ok(select_infinite(roster.entities(), &state.round_id)?)
    }

    /// Evaluate and record a guess in the current infinite round.
    pub fn submit_infinite_guess(
        &self,
        roster: &Roster,
        guess_id: &str,
    ) -> Result<(InfiniteState, GuessOutcome), SessionError> {
        let guess = find_guess(roster, guess_id)?;
        let mut state = self.infinite_state()?;
        let target = select_infinite(roster.entities(), &state.round_id)?;
        let outcome = state.apply_guess(evaluate_guess(guess, target));

        if !outcome.is_accepted() {
            debug!("Infinite guess {} rejected: {:?}", guess_id, outcome);
            return Ok((state, outcome));
        }

        let mut schema = self.store.load();
        schema.record_infinite(state.clone());
        self.store.save(&schema)?;

        match outcome {
            GuessOutcome::Won | GuessOutcome::Lost => info!(
                "Infinite round {} {:?} ({}/{} won)",
                state.round_id, outcome, state.total_wins, state.total_games
            ),
            _ => debug!("Infinite guess {} recorded", guess_id),
        }
        Ok((state, outcome))
    }

    /// Share text for the current infinite round.
    pub fn share_infinite(&self) -> Result<String, SessionError> {
        let state = self.infinite_state()?;
        Ok(format_share_text(
            &state.log.guesses,
            ShareMode::Infinite,
            state.log.is_won,
            &self.config,
        ))
    }

    // =========================================================================
    // MISC
    // =========================================================================

    /// Cumulative counters.
    pub fn stats(&self) -> Stats {
        self.store.load().stats
    }

    /// Autocomplete with the configured limit.
    pub fn search<'r>(&self, roster: &'r Roster, query: &str) -> Vec<&'r Entity> {
        search::search(roster.entities(), query, self.config.search_limit)
    }

    /// Wipe all stored state.
    pub fn reset(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        info!("Session state cleared");
        Ok(())
    }
}

fn find_guess<'r>(roster: &'r Roster, guess_id: &str) -> Result<&'r Entity, SessionError> {
    roster
        .get(guess_id)
        .ok_or_else(|| SessionError::UnknownEntity(guess_id.to_owned()))
}

// =============================================================================
// TESTS
// =============================================================================
