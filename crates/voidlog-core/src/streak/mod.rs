//! Streak state machine.
//!
//! - [`StreakState`]: start timestamp, longest streak and bounded history
//! - [`StreakStore`]: owns the state, persists it through a `KeyValueStore`
//! - [`codec`]: the stored key layout and its lenient decoding

pub mod codec;
mod elapsed;
mod state;
mod store;

pub use elapsed::{whole_days, Elapsed, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
pub use state::{HistoryEntry, StreakState, HISTORY_LIMIT};
pub use store::{ResetOutcome, StreakSnapshot, StreakStore};
