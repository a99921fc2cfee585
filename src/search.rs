//! Name Search
//!
//! Autocomplete over entity names and aliases. Matching is accent- and
//! punctuation-insensitive; results are ranked by how the query matched.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::game::entity::Entity;

/// Default number of suggestions.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Match quality, best first.
pub mod score {
    /// Name equals the query
    pub const NAME_EXACT: u8 = 100;
    /// Name starts with the query
    pub const NAME_PREFIX: u8 = 90;
    /// Name contains the query
    pub const NAME_SUBSTRING: u8 = 80;
    /// An alias equals the query
    pub const ALIAS_EXACT: u8 = 70;
    /// An alias starts with the query
    pub const ALIAS_PREFIX: u8 = 60;
    /// An alias contains the query
    pub const ALIAS_SUBSTRING: u8 = 50;
}

/// Fold a string for comparison.
///
/// Lowercases, strips diacritics, drops everything except ASCII letters,
/// digits and whitespace, then trims.
pub fn normalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let folded: String = lower
        .as_str()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    folded.trim().to_owned()
}

fn tier(candidate: &str, query: &str) -> Option<u8> {
    if candidate == query {
        Some(0)
    } else if candidate.starts_with(query) {
        Some(1)
    } else if candidate.contains(query) {
        Some(2)
    } else {
        None
    }
}

/// Score an entity against an already-normalized query. `None` means no match.
///
/// The name is tried first; otherwise the first alias that matches at
/// any tier decides the score.
pub fn score_match(entity: &Entity, query: &str) -> Option<u8> {
    if let Some(t) = tier(&normalize(&entity.name), query) {
        return Some(score::NAME_EXACT - 10 * t);
    }
    entity
        .aliases
        .iter()
        .find_map(|alias| tier(&normalize(alias), query))
        .map(|t| score::ALIAS_EXACT - 10 * t)
}

/// Best matches first, ties kept in roster order.
pub fn search<'a>(entities: &'a [Entity], query: &str, limit: usize) -> Vec<&'a Entity> {
    let query = normalize(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u8, &Entity)> = entities
        .iter()
        .filter_map(|e| score_match(e, &query).map(|s| (s, e)))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, e)| e).collect()
}

/// Entity whose name or an alias equals the query after normalization.
pub fn find_by_name<'a>(entities: &'a [Entity], name: &str) -> Option<&'a Entity> {
    let wanted = normalize(name);
    entities
        .iter()
        .find(|e| e.all_names().any(|n| normalize(n) == wanted))
}

/// Entity with the given id.
pub fn find_by_id<'a>(entities: &'a [Entity], id: &str) -> Option<&'a Entity> {
    entities.iter().find(|e| e.id == id)
}

/// Name followed by aliases.
pub fn all_names(entity: &Entity) -> Vec<String> {
    entity.all_names().map(str::to_owned).collect()
}

// =============================================================================
// TESTS
// =============================================================================
