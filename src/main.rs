//! OnePiecedle
//!
//! Terminal front end over the game engine. Session state lives in a JSON
//! file; the roster comes from the character data file.
//!
//! ```text
//! onepiecedle [play]             auto-play today's puzzle
//! onepiecedle guess <name>       guess today's puzzle
//! onepiecedle infinite [<name>]  show or guess the infinite round
//! onepiecedle new                start a new infinite round
//! onepiecedle search <query>     autocomplete names
//! onepiecedle arc <chapter>      arc containing a chapter
//! onepiecedle stats              streaks and totals
//! onepiecedle reset              clear saved state
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use onepiecedle::{
    core::{clock::SystemClock, hash::seed_from_str},
    game::{
        arc::arc_from_chapter,
        round::GuessOutcome,
        select::{daily_game_number_str, entity_sequence},
    },
    search::find_by_name,
    share::format_guess_row,
    GameConfig, GameSession, JsonFileStore, Roster, GAME_NAME, MAX_GUESSES, VERSION,
};

/// Daily One Piece character-guessing game
#[derive(Debug, Parser)]
#[command(name = "onepiecedle", version)]
struct Cli {
    /// Character data file (overrides ONEPIECEDLE_ROSTER)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Session state file (overrides ONEPIECEDLE_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Auto-play today's puzzle
    Play,

    /// Guess today's puzzle
    Guess {
        /// Character name or alias
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Show or guess the infinite round
    Infinite {
        /// Character name or alias; omit to show the round
        name: Vec<String>,
    },

    /// Start a new infinite round
    New,

    /// Autocomplete character names
    Search {
        /// Partial name or alias
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Arc containing a chapter
    Arc {
        /// Chapter number
        chapter: u32,
    },

    /// Streaks and totals
    Stats,

    /// Clear saved state
    Reset,
}

type Session = GameSession<JsonFileStore, SystemClock>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cfg!(feature = "debug-tracing") { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("{} v{}", GAME_NAME, VERSION);

    let mut config = GameConfig::from_env();
    if let Some(path) = cli.roster {
        config.roster_path = path;
    }
    if let Some(path) = cli.store {
        config.store_path = path;
    }

    let (roster, dropped) = Roster::load(&config.roster_path)
        .with_context(|| format!("failed to load roster from {}", config.roster_path.display()))?;
    if !dropped.is_empty() {
        warn!("{} roster records dropped", dropped.len());
    }
    info!("Roster: {} characters", roster.len());

    let store = JsonFileStore::new(&config.store_path);
    let session = GameSession::with_config(store, SystemClock, config);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play_daily(&session, &roster),
        Command::Guess { name } => guess_daily(&session, &roster, &name.join(" ")),
        Command::Infinite { name } if name.is_empty() => show_infinite(&session),
        Command::Infinite { name } => guess_infinite(&session, &roster, &name.join(" ")),
        Command::New => {
            let state = session.start_new_infinite_round()?;
            println!("New round {}", state.round_id);
            Ok(())
        }
        Command::Search { query } => {
            for entity in session.search(&roster, &query.join(" ")) {
                println!("{:<24} {}", entity.id, entity.name);
            }
            Ok(())
        }
        Command::Arc { chapter } => {
            println!("{}", arc_from_chapter(chapter).unwrap_or("?"));
            Ok(())
        }
        Command::Stats => {
            let stats = session.stats();
            println!("Daily streak:   {} (best {})", stats.daily_streak, stats.daily_max_streak);
            println!("Infinite:       {}/{} won", stats.infinite_total_wins, stats.infinite_total_games);
            Ok(())
        }
        Command::Reset => Ok(session.reset()?),
    }
}

/// Guess through a seeded shuffle of the roster until the round ends.
fn play_daily(session: &Session, roster: &Roster) -> Result<()> {
    let date = session.today();
    let game_number = daily_game_number_str(&date)?;
    println!("{} #{} ({})", GAME_NAME, game_number, date);

    let order = entity_sequence(roster.entities(), seed_from_str(&format!("autoplay-{date}")), roster.len() * 4)?;
    for entity in order {
        let (state, outcome) = session.submit_daily_guess(roster, &entity.id, &date)?;
        if outcome.is_accepted() {
            if let Some(last) = state.log.guesses.last() {
                println!("{}  {}", format_guess_row(last), last.entity_name);
            }
        }
        if state.log.is_finished {
            break;
        }
    }

    finish_daily(session, &date)
}

fn guess_daily(session: &Session, roster: &Roster, name: &str) -> Result<()> {
    let entity = find_by_name(roster.entities(), name).with_context(|| format!("no character named {name:?}"))?;
    let date = session.today();
    let (state, outcome) = session.submit_daily_guess(roster, &entity.id, &date)?;
    report(outcome, state.log.guesses.last().map(|g| (format_guess_row(g), g.entity_name.clone())));
    println!("{}/{} guesses used", state.log.guesses.len(), MAX_GUESSES);
    if state.log.is_finished {
        finish_daily(session, &date)?;
    }
    Ok(())
}

fn finish_daily(session: &Session, date: &str) -> Result<()> {
    let state = session.daily_state(date);
    if state.log.is_finished {
        println!();
        println!("{}", session.share_daily(date)?);
        let left = session.time_until_reset();
        println!();
        println!(
            "Next puzzle in {:02}:{:02}:{:02}",
            left.num_hours(),
            left.num_minutes() % 60,
            left.num_seconds() % 60
        );
    }
    Ok(())
}

fn show_infinite(session: &Session) -> Result<()> {
    let state = session.infinite_state()?;
    println!("Round {} ({}/{} won)", state.round_id, state.total_wins, state.total_games);
    for guess in &state.log.guesses {
        println!("{}  {}", format_guess_row(guess), guess.entity_name);
    }
    if state.log.is_finished {
        println!();
        println!("{}", session.share_infinite()?);
    }
    Ok(())
}

fn guess_infinite(session: &Session, roster: &Roster, name: &str) -> Result<()> {
    let entity = find_by_name(roster.entities(), name).with_context(|| format!("no character named {name:?}"))?;
    let (state, outcome) = session.submit_infinite_guess(roster, &entity.id)?;
    report(outcome, state.log.guesses.last().map(|g| (format_guess_row(g), g.entity_name.clone())));
    if state.log.is_finished {
        println!();
        println!("{}", session.share_infinite()?);
    }
    Ok(())
}

fn report(outcome: GuessOutcome, last: Option<(String, String)>) {
    match outcome {
        GuessOutcome::Duplicate => println!("Already guessed."),
        GuessOutcome::AlreadyFinished => println!("Round is over."),
        _ => {
            if let Some((row, name)) = last {
                println!("{row}  {name}");
            }
            match outcome {
                GuessOutcome::Won => println!("Correct!"),
                GuessOutcome::Lost => println!("Out of guesses."),
                _ => {}
            }
        }
    }
}
