//! Session Persistence and Orchestration
//!
//! - `store`: Persisted schema and the load/save boundary
//! - `manager`: Guess submission against a store and a clock

pub mod manager;
pub mod store;

pub use manager::{GameSession, SessionError};
pub use store::{JsonFileStore, MemoryStore, SessionStore, StorageSchema, StoreError, STORAGE_VERSION};
