//! Target Selection
//!
//! Deterministic choice of the answer for a daily puzzle (seeded by the UTC
//! date) or an infinite round (seeded by the round id), plus the calendar
//! helpers daily mode needs.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::Rng;

use crate::core::clock::Clock;
use crate::core::hash::seed_from_str;
use crate::core::rng::DeterministicRng;
use crate::game::entity::Entity;

/// Day 1 of the daily puzzle.
pub const REFERENCE_DATE: (i32, u32, u32) = (2024, 1, 1);

/// Exclusive upper bound of the random part of a round id.
pub const ROUND_ID_RANDOM_RANGE: u32 = 1_000_000;

/// Selection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// No entity to select from.
    #[error("cannot select from an empty roster")]
    EmptyRoster,

    /// Date string is not `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Pick one entity for a seed.
///
/// Same seed and same roster order always give the same entity.
pub fn select_deterministic(roster: &[Entity], seed: u32) -> Result<&Entity, SelectError> {
    DeterministicRng::new(seed)
        .choose(roster)
        .ok_or(SelectError::EmptyRoster)
}

/// Pick `count` entities from one seeded stream.
pub fn entity_sequence(roster: &[Entity], seed: u32, count: usize) -> Result<Vec<&Entity>, SelectError> {
    if roster.is_empty() {
        return Err(SelectError::EmptyRoster);
    }
    let mut rng = DeterministicRng::new(seed);
    Ok((0..count).map(|_| &roster[rng.next_index(roster.len())]).collect())
}

/// Derive a follow-up seed from the first draw of a seed's stream.
pub fn next_seed(seed: u32) -> u32 {
    let r = DeterministicRng::new(seed).next_f64();
    (r * 2_147_483_647.0).floor() as u32
}

// =============================================================================
// DAILY
// =============================================================================

/// UTC calendar date as `YYYY-MM-DD`.
pub fn utc_date_string(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> Result<NaiveDate, SelectError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| SelectError::InvalidDate(date.to_owned()))
}

/// Pick the answer for a daily puzzle.
pub fn select_daily<'a>(roster: &'a [Entity], date: &str) -> Result<&'a Entity, SelectError> {
    select_deterministic(roster, seed_from_str(date))
}

fn reference_date() -> NaiveDate {
    let (y, m, d) = REFERENCE_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Puzzle number for a date: the reference date is #1.
pub fn daily_game_number(date: NaiveDate) -> i64 {
    (date - reference_date()).num_days() + 1
}

/// Puzzle number for a `YYYY-MM-DD` string.
pub fn daily_game_number_str(date: &str) -> Result<i64, SelectError> {
    parse_date(date).map(daily_game_number)
}

/// Check if a date string is today's date (UTC).
pub fn is_today(date: &str, now: DateTime<Utc>) -> bool {
    date == utc_date_string(now)
}

/// Time left until the next daily reset (midnight UTC).
pub fn time_until_reset(now: DateTime<Utc>) -> chrono::Duration {
    let next_midnight = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc());
    match next_midnight {
        Some(reset) => reset - now,
        None => chrono::Duration::zero(),
    }
}

// =============================================================================
// INFINITE
// =============================================================================

/// Round id `"<epoch millis>-<random 0..999999>"`.
pub fn generate_round_id<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
    let random = rng.gen_range(0..ROUND_ID_RANDOM_RANGE);
    format!("{now_millis}-{random}")
}

/// Fresh round id from the clock and the thread-local RNG.
pub fn new_round_id<C: Clock + ?Sized>(clock: &C) -> String {
    generate_round_id(clock.now_millis(), &mut rand::thread_rng())
}

/// Pick the answer for an infinite round.
pub fn select_infinite<'a>(roster: &'a [Entity], round_id: &str) -> Result<&'a Entity, SelectError> {
    select_deterministic(roster, seed_from_str(round_id))
}

// =============================================================================
// TESTS
// =============================================================================
