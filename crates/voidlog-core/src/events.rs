use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::{Elapsed, HistoryEntry};

/// What the core reports to a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Current streak, as polled every tick.
    StateSnapshot {
        elapsed: Elapsed,
        current_days: u64,
        longest_streak: u64,
        history_len: usize,
        started_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A streak ended and a new one started.
    StreakReset {
        entry: HistoryEntry,
        longest_streak: u64,
        new_record: bool,
        /// False when the durable write failed; the reset still happened
        /// for this session.
        persisted: bool,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::StreakReset {
            entry: HistoryEntry::new(0, 2),
            longest_streak: 2,
            new_record: true,
            persisted: true,
            at: DateTime::from_timestamp_millis(0).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StreakReset");
        assert_eq!(json["entry"]["duration"], 2);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
