//! Streak store: owns the live [`StreakState`] and keeps it durable.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = StreakStore::open(Database::open()?, SystemClock);
//! // Every tick:
//! let elapsed = store.elapsed_now();
//! // On confirmed reset:
//! let outcome = store.reset_now();
//! ```
//!
//! The in-memory state is the source of truth for the running session.
//! A failed write is reported in the [`ResetOutcome`] and never rolls the
//! state back.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::codec::{self, HISTORY_KEY, LONGEST_KEY, START_KEY};
use super::elapsed::Elapsed;
use super::state::{HistoryEntry, StreakState};
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::events::Event;
use crate::storage::KeyValueStore;

/// Result of [`StreakStore::reset_streak`].
#[derive(Debug)]
pub struct ResetOutcome {
    /// The entry recorded for the streak that just ended.
    pub entry: HistoryEntry,
    /// Whether the ended streak set a new longest streak.
    pub new_record: bool,
    /// State after the reset.
    pub state: StreakState,
    /// Set when the durable write failed. Non-fatal.
    pub persist_error: Option<StorageError>,
}

impl ResetOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn to_event(&self) -> Event {
        Event::StreakReset {
            entry: self.entry.clone(),
            longest_streak: self.state.longest_streak(),
            new_record: self.new_record,
            persisted: self.is_persisted(),
            at: self.entry.completed_at,
        }
    }
}

/// Point-in-time view for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSnapshot {
    pub elapsed: Elapsed,
    pub current_days: u64,
    pub longest_streak: u64,
    pub history_len: usize,
    pub started_at: DateTime<Utc>,
    /// The clock reading every other field was computed from.
    pub taken_at: DateTime<Utc>,
}

impl StreakSnapshot {
    pub fn to_event(&self) -> Event {
        Event::StateSnapshot {
            elapsed: self.elapsed,
            current_days: self.current_days,
            longest_streak: self.longest_streak,
            history_len: self.history_len,
            started_at: self.started_at,
            at: self.taken_at,
        }
    }
}

pub struct StreakStore<P, C = SystemClock> {
    persistence: P,
    clock: C,
    state: StreakState,
}

impl<P: KeyValueStore, C: Clock> StreakStore<P, C> {
    /// Load state from `persistence`, falling back to the first-run state.
    ///
    /// Keys absent from storage are seeded with their defaults so the next
    /// load sees the same state. Malformed values are replaced in memory
    /// only; what is on disk is left for the next reset to overwrite.
    pub fn open(persistence: P, clock: C) -> Self {
        let now_ms = clock.now_ms();
        let decoded = read_state(&persistence, now_ms);

        if !decoded.missing_keys.is_empty() {
            let result = codec::encode_keys(&decoded.state, &decoded.missing_keys)
                .map_err(StorageError::from)
                .and_then(|entries| persistence.set_many(&entries));
            if let Err(e) = result {
                tracing::warn!(error = %e, keys = ?decoded.missing_keys, "could not seed streak state");
            }
        }

        tracing::debug!(
            start = decoded.state.start_timestamp(),
            longest = decoded.state.longest_streak(),
            history = decoded.state.history().len(),
            "streak state loaded"
        );

        Self {
            persistence,
            clock,
            state: decoded.state,
        }
    }

    /// Reconstruct state from persistence without touching the live state.
    pub fn load(&self) -> StreakState {
        read_state(&self.persistence, self.clock.now_ms()).state
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn start_timestamp(&self) -> i64 {
        self.state.start_timestamp()
    }

    pub fn longest_streak(&self) -> u64 {
        self.state.longest_streak()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.state.history()
    }

    pub fn elapsed(&self, now_ms: i64) -> Elapsed {
        self.state.elapsed(now_ms)
    }

    pub fn elapsed_now(&self) -> Elapsed {
        self.elapsed(self.clock.now_ms())
    }

    pub fn snapshot(&self) -> StreakSnapshot {
        let now_ms = self.clock.now_ms();
        StreakSnapshot {
            elapsed: self.state.elapsed(now_ms),
            current_days: self.state.current_days(now_ms),
            longest_streak: self.state.longest_streak(),
            history_len: self.state.history().len(),
            started_at: DateTime::from_timestamp_millis(self.state.start_timestamp())
                .unwrap_or_default(),
            taken_at: DateTime::from_timestamp_millis(now_ms).unwrap_or_default(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// End the current streak at `now_ms` and start a new one.
    ///
    /// Performs exactly one batch write of all three keys.
    pub fn reset_streak(&mut self, now_ms: i64) -> ResetOutcome {
        let previous_longest = self.state.longest_streak();
        let entry = self.state.apply_reset(now_ms);
        let new_record = self.state.longest_streak() > previous_longest;

        let persist_error = codec::encode_state(&self.state)
            .map_err(StorageError::from)
            .and_then(|entries| self.persistence.set_many(&entries))
            .err();

        match &persist_error {
            None => tracing::debug!(
                days = entry.duration_days,
                longest = self.state.longest_streak(),
                new_record,
                "streak reset"
            ),
            Some(e) => tracing::warn!(
                error = %e,
                days = entry.duration_days,
                "streak reset kept in memory only; persistence failed"
            ),
        }

        ResetOutcome {
            entry,
            new_record,
            state: self.state.clone(),
            persist_error,
        }
    }

    pub fn reset_now(&mut self) -> ResetOutcome {
        let now_ms = self.clock.now_ms();
        self.reset_streak(now_ms)
    }
}

fn read_state<P: KeyValueStore>(persistence: &P, now_ms: i64) -> codec::Decoded {
    let read = |key: &str| match persistence.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored value, using default");
            None
        }
    };

    let start = read(START_KEY);
    let longest = read(LONGEST_KEY);
    let history = read(HISTORY_KEY);
    codec::decode_state(
        start.as_deref(),
        longest.as_deref(),
        history.as_deref(),
        now_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::streak::elapsed::MS_PER_DAY;
    use crate::streak::state::HISTORY_LIMIT;

    const T: i64 = 1_700_000_000_000;

    #[test]
    fn first_run_starts_now_and_seeds_storage() {
        let mem = MemoryStore::new();
        let clock = ManualClock::new(T);
        let store = StreakStore::open(&mem, &clock);

        assert_eq!(store.state(), &StreakState::initial(T));
        assert_eq!(mem.raw(START_KEY).as_deref(), Some("1700000000000"));
        assert_eq!(mem.raw(LONGEST_KEY).as_deref(), Some("0"));
        assert_eq!(mem.raw(HISTORY_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn load_is_idempotent() {
        let mem = MemoryStore::new();
        let clock = ManualClock::new(T);
        let store = StreakStore::open(&mem, &clock);

        let first = store.load();
        clock.advance(5_000);
        let second = store.load();
        assert_eq!(first, second);
        assert_eq!(&first, store.state());
    }

    #[test]
    fn load_does_not_write() {
        let mem = MemoryStore::with_entries([(START_KEY, "1"), (LONGEST_KEY, "0"), (HISTORY_KEY, "[]")]);
        let store = StreakStore::open(&mem, ManualClock::new(T));
        store.load();
        store.load();
        assert_eq!(mem.write_count(), 0);
    }

    #[test]
    fn reset_performs_one_write() {
        let mem = MemoryStore::new();
        let clock = ManualClock::new(T);
        let mut store = StreakStore::open(&mem, &clock);
        let writes = mem.write_count();

        clock.advance(3 * MS_PER_DAY + 5_000);
        let outcome = store.reset_now();

        assert!(outcome.is_persisted());
        assert_eq!(mem.write_count(), writes + 1);
        assert_eq!(outcome.entry.duration_days, 3);
        assert!(outcome.new_record);
        assert_eq!(store.start_timestamp(), T + 3 * MS_PER_DAY + 5_000);
    }

    #[test]
    fn reset_survives_write_failure() {
        let mem = MemoryStore::new();
        let clock = ManualClock::new(T);
        let mut store = StreakStore::open(&mem, &clock);
        mem.fail_writes(true);

        let outcome = store.reset_streak(T + 2 * MS_PER_DAY);

        assert!(matches!(
            outcome.persist_error,
            Some(StorageError::Unavailable(_))
        ));
        assert_eq!(store.longest_streak(), 2);
        assert_eq!(store.history().len(), 1);
        // Storage still holds the pre-reset state.
        assert_eq!(mem.raw(LONGEST_KEY).as_deref(), Some("0"));
        assert!(matches!(
            outcome.to_event(),
            Event::StreakReset { persisted: false, .. }
        ));
    }

    #[test]
    fn reopen_sees_persisted_reset() {
        let mem = MemoryStore::new();
        let clock = ManualClock::new(T);
        let mut store = StreakStore::open(&mem, &clock);
        let outcome = store.reset_streak(T + 4 * MS_PER_DAY);
        drop(store);

        let reopened = StreakStore::open(&mem, &clock);
        assert_eq!(reopened.state(), &outcome.state);
    }

    #[test]
    fn corrupt_history_is_left_on_disk() {
        let mem = MemoryStore::with_entries([
            (START_KEY, T.to_string()),
            (LONGEST_KEY, "6".to_string()),
            (HISTORY_KEY, "<<garbage>>".to_string()),
        ]);
        let store = StreakStore::open(&mem, ManualClock::new(T));

        assert!(store.history().is_empty());
        assert_eq!(store.longest_streak(), 6);
        assert_eq!(mem.raw(HISTORY_KEY).as_deref(), Some("<<garbage>>"));
        assert_eq!(mem.write_count(), 0);
    }

    #[test]
    fn widget_history_with_rollback_and_broken_entry_survives_open() {
        let raw = r#"[
            {"id":1700000300000,"date":"2023-11-14T22:18:20.000Z","duration":-1},
            {"id":1700000200000,"date":"not a date","duration":4},
            {"id":1700000100000,"date":"2023-11-14T22:15:00.000Z","duration":6}
        ]"#;
        let mem = MemoryStore::with_entries([
            (START_KEY, T.to_string()),
            (LONGEST_KEY, "6".to_string()),
            (HISTORY_KEY, raw.to_string()),
        ]);
        let store = StreakStore::open(&mem, ManualClock::new(T));

        let durations: Vec<u64> = store.history().iter().map(|e| e.duration_days).collect();
        assert_eq!(durations, vec![0, 6]);
        assert_eq!(store.history()[0].id, 1_700_000_300_000);
        assert_eq!(mem.raw(HISTORY_KEY).as_deref(), Some(raw));
        assert_eq!(mem.write_count(), 0);
    }

    #[test]
    fn missing_key_is_seeded_beside_malformed_one() {
        let mem = MemoryStore::with_entries([(START_KEY, "soon"), (HISTORY_KEY, "[]")]);
        let store = StreakStore::open(&mem, ManualClock::new(T));

        assert_eq!(store.start_timestamp(), T);
        assert_eq!(mem.raw(START_KEY).as_deref(), Some("soon"));
        assert_eq!(mem.raw(LONGEST_KEY).as_deref(), Some("0"));
    }

    #[test]
    fn failed_seed_write_keeps_initial_state() {
        let mem = MemoryStore::new();
        mem.fail_writes(true);
        let store = StreakStore::open(&mem, ManualClock::new(T));

        assert_eq!(store.state(), &StreakState::initial(T));
        assert_eq!(mem.write_count(), 0);
        assert!(mem.raw(START_KEY).is_none());
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let clock = ManualClock::new(T);
        let mut store = StreakStore::open(MemoryStore::new(), &clock);

        for i in 1..=25 {
            clock.advance(MS_PER_DAY);
            let outcome = store.reset_now();
            assert_eq!(store.history()[0], outcome.entry);
            assert_eq!(outcome.entry.id, T + i * MS_PER_DAY);
        }

        assert_eq!(store.history().len(), HISTORY_LIMIT);
        assert_eq!(store.history().last().unwrap().id, T + 6 * MS_PER_DAY);
    }

    #[test]
    fn snapshot_reflects_clock() {
        let clock = ManualClock::new(T);
        let store = StreakStore::open(MemoryStore::new(), &clock);
        clock.advance(MS_PER_DAY + 61_000);

        let snap = store.snapshot();
        assert_eq!(snap.current_days, 1);
        assert_eq!(snap.elapsed.minutes, 1);
        assert_eq!(snap.elapsed.seconds, 1);
        assert_eq!(snap.started_at.timestamp_millis(), T);
        assert_eq!(snap.history_len, 0);
        assert_eq!(snap.taken_at.timestamp_millis(), T + MS_PER_DAY + 61_000);

        match snap.to_event() {
            Event::StateSnapshot { at, elapsed, .. } => {
                assert_eq!(at, snap.taken_at);
                assert_eq!(elapsed, snap.elapsed);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
