//! Session Persistence
//!
//! The persisted shape of all session state plus the stores that hold it.
//! Stores never hand corrupt data to callers: anything unreadable is
//! replaced by a fresh schema.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::hash::StateHasher;
use crate::game::round::{DailyState, InfiniteState, Stats};

/// Current storage schema version.
pub const STORAGE_VERSION: u32 = 2;

// =============================================================================
// SCHEMA
// =============================================================================

/// Everything a player's session persists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSchema {
    /// Schema version
    pub version: u32,
    /// Daily puzzles by date
    pub daily: BTreeMap<String, DailyState>,
    /// Current infinite round. An empty round id means none started yet.
    pub infinite: InfiniteState,
    /// Cumulative counters
    pub stats: Stats,
}

impl Default for StorageSchema {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            daily: BTreeMap::new(),
            infinite: InfiniteState::new("", 0, 0),
            stats: Stats::default(),
        }
    }
}

impl StorageSchema {
    /// Stored state for a date, or a fresh one seeded from the stats.
    pub fn daily_or_new(&self, date: &str) -> DailyState {
        self.daily
            .get(date)
            .cloned()
            .unwrap_or_else(|| DailyState::new(date, &self.stats))
    }

    /// Store a daily state and mirror its result into the stats.
    pub fn record_daily(&mut self, state: DailyState) {
        if state.log.is_finished {
            if state.log.is_won {
                self.stats.daily_streak = state.streak;
                self.stats.daily_max_streak = self.stats.daily_max_streak.max(state.streak);
            } else {
                self.stats.daily_streak = 0;
            }
        }
        self.daily.insert(state.date.clone(), state);
    }

    /// Replace the infinite round and copy its totals into the stats.
    pub fn record_infinite(&mut self, state: InfiniteState) {
        self.stats.infinite_total_wins = state.total_wins;
        self.stats.infinite_total_games = state.total_games;
        self.infinite = state;
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding failure.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load/save boundary for session state.
///
/// `load` is infallible: implementations reset to a fresh schema instead
/// of surfacing unreadable data.
pub trait SessionStore {
    /// Load the current schema.
    fn load(&self) -> StorageSchema;

    /// Persist a schema, replacing whatever was stored.
    fn save(&self, schema: &StorageSchema) -> Result<(), StoreError>;

    /// Drop all stored state.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schema: Mutex<Option<StorageSchema>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with a schema.
    pub fn with_schema(schema: StorageSchema) -> Self {
        Self {
            schema: Mutex::new(Some(schema)),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> StorageSchema {
        let guard = self.schema.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(schema) if schema.version == STORAGE_VERSION => schema.clone(),
            Some(schema) => {
                warn!("Discarding session state with version {}", schema.version);
                StorageSchema::default()
            }
            None => StorageSchema::default(),
        }
    }

    fn save(&self, schema: &StorageSchema) -> Result<(), StoreError> {
        let mut guard = self.schema.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(schema.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.schema.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// On-disk wrapper: the schema plus a SHA-256 of its encoding.
#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    checksum: String,
    data: serde_json::Value,
}

fn checksum(version: u32, data: &serde_json::Value) -> Result<String, serde_json::Error> {
    let mut hasher = StateHasher::for_storage(version);
    hasher.update_bytes(&serde_json::to_vec(data)?);
    Ok(hasher.finalize_hex())
}

/// Reasons a stored file is rejected.
#[derive(Debug, thiserror::Error)]
enum Rejected {
    #[error("unparseable: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported version {found}")]
    Version { found: u32 },
    #[error("checksum mismatch")]
    Checksum,
}

/// Session state in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(raw: &str) -> Result<StorageSchema, Rejected> {
        let envelope: Envelope = serde_json::from_str(raw)?;
        if envelope.version != STORAGE_VERSION {
            return Err(Rejected::Version { found: envelope.version });
        }
        if checksum(envelope.version, &envelope.data)? != envelope.checksum {
            return Err(Rejected::Checksum);
        }
        let schema: StorageSchema = serde_json::from_value(envelope.data)?;
        if schema.version != STORAGE_VERSION {
            return Err(Rejected::Version { found: schema.version });
        }
        Ok(schema)
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> StorageSchema {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return StorageSchema::default();
            }
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                return StorageSchema::default();
            }
        };

        match Self::decode(&raw) {
            Ok(schema) => schema,
            Err(reason) => {
                warn!("Resetting session state in {}: {}", self.path.display(), reason);
                StorageSchema::default()
            }
        }
    }

    fn save(&self, schema: &StorageSchema) -> Result<(), StoreError> {
        let data = serde_json::to_value(schema)?;
        let envelope = Envelope {
            version: schema.version,
            checksum: checksum(schema.version, &data)?,
            data,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&envelope)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Saved session state to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::evaluate::evaluate_guess;
    use crate::game::entity::fixtures;

    fn won_daily(date: &str, streak_before: u32) -> DailyState {
        let stats = Stats { daily_streak: streak_before, daily_max_streak: streak_before, ..Stats::default() };
        let mut state = DailyState::new(date, &stats);
        state.apply_guess(evaluate_guess(&fixtures::luffy(), &fixtures::luffy()));
        state
    }

    fn lost_daily(date: &str) -> DailyState {
        let mut state = DailyState::new(date, &Stats::default());
        state.log.is_finished = true;
        state
    }

    #[test]
    fn test_default_schema() {
        let schema = StorageSchema::default();
        assert_eq!(schema.version, STORAGE_VERSION);
        assert!(schema.daily.is_empty());
        assert!(schema.infinite.round_id.is_empty());
        assert_eq!(schema.stats, Stats::default());
    }

    #[test]
    fn test_record_daily_updates_stats() {
        let mut schema = StorageSchema::default();
        schema.stats.daily_max_streak = 10;

        schema.record_daily(won_daily("2024-06-15", 2));
        assert_eq!(schema.stats.daily_streak, 3);
        assert_eq!(schema.stats.daily_max_streak, 10);

        schema.record_daily(lost_daily("2024-06-16"));
        assert_eq!(schema.stats.daily_streak, 0);
        assert_eq!(schema.stats.daily_max_streak, 10);
        assert_eq!(schema.daily.len(), 2);
    }

    #[test]
    fn test_record_unfinished_daily_keeps_stats() {
        let mut schema = StorageSchema::default();
        schema.stats.daily_streak = 4;
        let state = DailyState::new("2024-06-15", &schema.stats);
        schema.record_daily(state);
        assert_eq!(schema.stats.daily_streak, 4);
    }

    #[test]
    fn test_daily_or_new_uses_stats() {
        let mut schema = StorageSchema::default();
        schema.stats.daily_streak = 5;
        schema.stats.daily_max_streak = 8;
        let state = schema.daily_or_new("2024-06-20");
        assert_eq!((state.streak, state.max_streak), (5, 8));
        assert!(!schema.daily.contains_key("2024-06-20"));
    }

    #[test]
    fn test_record_infinite_copies_totals() {
        let mut schema = StorageSchema::default();
        schema.record_infinite(InfiniteState::new("1-1", 3, 7));
        assert_eq!(schema.stats.infinite_total_wins, 3);
        assert_eq!(schema.stats.infinite_total_games, 7);
        assert_eq!(schema.infinite.round_id, "1-1");
    }

    #[test]
    fn test_memory_store_roundtrip_and_clear() {
        let store = MemoryStore::new();
        let mut schema = StorageSchema::default();
        schema.record_daily(won_daily("2024-06-15", 0));

        store.save(&schema).unwrap();
        assert_eq!(store.load(), schema);

        store.clear().unwrap();
        assert_eq!(store.load(), StorageSchema::default());
    }

    #[test]
    fn test_memory_store_rejects_old_version() {
        let schema = StorageSchema { version: 1, ..StorageSchema::default() };
        let store = MemoryStore::with_schema(schema);
        assert_eq!(store.load().version, STORAGE_VERSION);
    }

    #[test]
    fn test_file_store_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("session.json"));
        assert_eq!(store.load(), StorageSchema::default());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("session.json"));

        let mut schema = StorageSchema::default();
        schema.record_daily(won_daily("2024-06-15", 1));
        schema.record_infinite(InfiniteState::new("1700000000000-5", 1, 2));
        store.save(&schema).unwrap();

        assert_eq!(store.load(), schema);
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_resets_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), StorageSchema::default());
    }

    #[test]
    fn test_file_store_resets_on_tamper() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = JsonFileStore::new(&path);

        let mut schema = StorageSchema::default();
        schema.stats.daily_streak = 3;
        schema.stats.daily_max_streak = 3;
        store.save(&schema).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let mut envelope: serde_json::Value = serde_json::from_str(&raw).unwrap();
        envelope["data"]["stats"]["dailyStreak"] = serde_json::json!(99);
        fs::write(&path, envelope.to_string()).unwrap();

        assert_eq!(store.load(), StorageSchema::default());
    }

    #[test]
    fn test_file_store_resets_on_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = JsonFileStore::new(&path);

        let schema = StorageSchema { version: 1, ..StorageSchema::default() };
        store.save(&schema).unwrap();
        assert_eq!(store.load().version, STORAGE_VERSION);
    }
}
