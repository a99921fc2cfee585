//! Share Text
//!
//! Plain-text result grid players paste elsewhere:
//!
//! ```text
//! OnePiecedle #167 3/6
//!
//! 🟥🟩🟥🟥🔺🔺🟩🔻
//! 🟩🟩🟥🟩🔻🔻🟩🟩
//! 🟩🟩🟩🟩🟩🟩🟩🟩
//!
//! https://onepiecedle.com
//! ```

use crate::config::GameConfig;
use crate::game::category::TileStatus;
use crate::game::evaluate::GuessResult;
use crate::MAX_GUESSES;

/// Which header to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Daily puzzle with its number
    Daily {
        /// Puzzle number
        game_number: i64,
    },
    /// Infinite round
    Infinite,
}

/// Grid symbol for a tile.
pub fn status_emoji(status: TileStatus) -> &'static str {
    match status {
        TileStatus::Correct => "🟩",
        TileStatus::Partial => "🟨",
        TileStatus::Higher => "🔺",
        TileStatus::Lower => "🔻",
        TileStatus::Wrong | TileStatus::Unknown => "🟥",
    }
}

/// Arrow shown beside an ordered tile.
pub fn arrow_indicator(status: TileStatus) -> &'static str {
    match status {
        TileStatus::Higher => "↑",
        TileStatus::Lower => "↓",
        _ => "",
    }
}

/// One grid row.
pub fn format_guess_row(guess: &GuessResult) -> String {
    guess.statuses().map(status_emoji).collect()
}

/// Full share text. Attempts show as `X` when the round was lost.
pub fn format_share_text(guesses: &[GuessResult], mode: ShareMode, is_won: bool, config: &GameConfig) -> String {
    let attempts = if is_won {
        guesses.len().to_string()
    } else {
        "X".to_string()
    };
    let header = match mode {
        ShareMode::Daily { game_number } => {
            format!("{} #{} {}/{}", config.game_name, game_number, attempts, MAX_GUESSES)
        }
        ShareMode::Infinite => format!("{} (Infinite) {}/{}", config.game_name, attempts, MAX_GUESSES),
    };

    let mut lines = vec![header, String::new()];
    lines.extend(guesses.iter().map(format_guess_row));
    lines.push(String::new());
    lines.push(config.share_url.clone());
    lines.join("\n")
}

// =============================================================================
// TESTS
// =============================================================================
