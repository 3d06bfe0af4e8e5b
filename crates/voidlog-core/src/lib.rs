//! # voidlog Core Library
//!
//! Streak tracking for a single user on a single device: how long since the
//! last reset, the longest streak ever reached, and a short log of past
//! streaks, all kept durable across restarts.
//!
//! ## Architecture
//!
//! - **Clock**: source of epoch milliseconds, swappable for tests
//! - **Streak**: the state machine and its store; `reset_streak` is the only
//!   mutation
//! - **Storage**: string key-value persistence (SQLite or in-memory) and
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`StreakStore`]: owns the live state and persists it
//! - [`KeyValueStore`]: persistence port
//! - [`Database`]: SQLite implementation of the port
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod storage;
pub mod streak;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use streak::{
    Elapsed, HistoryEntry, ResetOutcome, StreakSnapshot, StreakState, StreakStore, HISTORY_LIMIT,
};
