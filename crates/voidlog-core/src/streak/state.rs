//! The durable streak state and its single transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::elapsed::{whole_days, Elapsed};

/// Maximum number of history entries kept. Older entries are dropped.
pub const HISTORY_LIMIT: usize = 20;

/// One completed streak.
///
/// Field names on the wire (`id`, `date`, `duration`) match the layout the
/// history key has always used, so existing data keeps loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredHistoryEntry")]
pub struct HistoryEntry {
    /// Reset timestamp in epoch milliseconds.
    pub id: i64,
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_days: u64,
}

/// Wire form of a history entry. Older data can carry a negative duration
/// (written after the clock moved backwards); it reads as zero days.
#[derive(Deserialize)]
struct StoredHistoryEntry {
    id: i64,
    date: DateTime<Utc>,
    duration: i64,
}

impl From<StoredHistoryEntry> for HistoryEntry {
    fn from(stored: StoredHistoryEntry) -> Self {
        Self {
            id: stored.id,
            completed_at: stored.date,
            duration_days: stored.duration.max(0) as u64,
        }
    }
}

impl HistoryEntry {
    pub fn new(reset_at_ms: i64, duration_days: u64) -> Self {
        Self {
            id: reset_at_ms,
            completed_at: DateTime::from_timestamp_millis(reset_at_ms).unwrap_or_default(),
            duration_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    start_timestamp: i64,
    longest_streak: u64,
    history: Vec<HistoryEntry>,
}

impl StreakState {
    /// First-run state: the streak starts now with no record and no history.
    pub fn initial(now_ms: i64) -> Self {
        Self {
            start_timestamp: now_ms,
            longest_streak: 0,
            history: Vec::new(),
        }
    }

    /// Build a state from stored parts. History beyond [`HISTORY_LIMIT`] is
    /// truncated, keeping the newest entries.
    pub fn from_parts(start_timestamp: i64, longest_streak: u64, mut history: Vec<HistoryEntry>) -> Self {
        history.truncate(HISTORY_LIMIT);
        Self {
            start_timestamp,
            longest_streak,
            history,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    pub fn longest_streak(&self) -> u64 {
        self.longest_streak
    }

    /// Completed streaks, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn elapsed(&self, now_ms: i64) -> Elapsed {
        Elapsed::between(self.start_timestamp, now_ms)
    }

    pub fn current_days(&self, now_ms: i64) -> u64 {
        whole_days(self.start_timestamp, now_ms)
    }

    // ── Transition ───────────────────────────────────────────────────

    /// End the current streak at `now_ms` and start a new one.
    ///
    /// Returns the history entry recorded for the streak that just ended.
    /// The start timestamp never moves backwards: if the clock reads earlier
    /// than the current start, the streak restarts at the existing start.
    pub fn apply_reset(&mut self, now_ms: i64) -> HistoryEntry {
        let current_days = self.current_days(now_ms);
        if current_days > self.longest_streak {
            self.longest_streak = current_days;
        }

        let entry = HistoryEntry::new(now_ms, current_days);
        self.history.insert(0, entry.clone());
        self.history.truncate(HISTORY_LIMIT);

        self.start_timestamp = self.start_timestamp.max(now_ms);
        entry
    }
}
