//! Game Configuration

use std::path::PathBuf;

use crate::search::DEFAULT_SEARCH_LIMIT;

/// Environment variable overriding the roster path.
pub const ROSTER_ENV: &str = "ONEPIECEDLE_ROSTER";

/// Environment variable overriding the session file path.
pub const STORE_ENV: &str = "ONEPIECEDLE_STORE";

/// Game configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Name used in share headers.
    pub game_name: String,
    /// Link appended to share text.
    pub share_url: String,
    /// Autocomplete result cap.
    pub search_limit: usize,
    /// Character data file.
    pub roster_path: PathBuf,
    /// Session state file.
    pub store_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_name: crate::GAME_NAME.to_string(),
            share_url: "https://onepiecedle.com".to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            roster_path: PathBuf::from("data/characters.json"),
            store_path: PathBuf::from("onepiecedle_v2.json"),
        }
    }
}

impl GameConfig {
    /// Defaults with paths overridden from the environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply path overrides from a lookup. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ROSTER_ENV).filter(|v| !v.is_empty()) {
            self.roster_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(STORE_ENV).filter(|v| !v.is_empty()) {
            self.store_path = PathBuf::from(path);
        }
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
