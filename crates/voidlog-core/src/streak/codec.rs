//! Key layout and lenient decoding of the persisted streak state.
//!
//! Three independent keys are stored:
//!
//! | key          | value                                   |
//! |--------------|-----------------------------------------|
//! | `v3_start`   | epoch milliseconds, decimal             |
//! | `v3_longest` | whole days, decimal                     |
//! | `v3_history` | JSON array of [`HistoryEntry`], newest first |
//!
//! A value that is missing or fails to parse decodes to that key's default.
//! History is decoded entry by entry: an entry that cannot be read is
//! skipped and the rest are kept. Decoding never fails as a whole.

use super::state::{HistoryEntry, StreakState};

pub const START_KEY: &str = "v3_start";
pub const LONGEST_KEY: &str = "v3_longest";
pub const HISTORY_KEY: &str = "v3_history";

pub const ALL_KEYS: [&str; 3] = [START_KEY, LONGEST_KEY, HISTORY_KEY];

/// Outcome of decoding one stored key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Stored(T),
    Missing,
    Malformed(String),
}

impl<T> Field<T> {
    /// Only absent keys are seeded. A malformed value stays on disk untouched.
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn unwrap_or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Field::Stored(value) => value,
            Field::Missing | Field::Malformed(_) => default(),
        }
    }
}

pub fn decode_start(raw: Option<&str>) -> Field<i64> {
    decode_integer(raw)
}

pub fn decode_longest(raw: Option<&str>) -> Field<u64> {
    decode_integer(raw)
}

pub fn decode_history(raw: Option<&str>) -> Field<Vec<HistoryEntry>> {
    match raw {
        None => Field::Missing,
        Some(text) => match serde_json::from_str::<Vec<serde_json::Value>>(text) {
            Ok(items) => Field::Stored(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| {
                        serde_json::from_value::<HistoryEntry>(item)
                            .map_err(|e| {
                                tracing::warn!(index, error = %e, "skipping unreadable history entry");
                            })
                            .ok()
                    })
                    .collect(),
            ),
            Err(e) => Field::Malformed(e.to_string()),
        },
    }
}

fn decode_integer<T: std::str::FromStr>(raw: Option<&str>) -> Field<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Field::Missing,
        Some(text) => match text.trim().parse::<T>() {
            Ok(value) => Field::Stored(value),
            Err(e) => Field::Malformed(format!("{text:?}: {e}")),
        },
    }
}

/// A decoded state plus the keys that were absent from storage.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub state: StreakState,
    pub missing_keys: Vec<&'static str>,
}

/// Decode the three raw values. `now_ms` seeds the start timestamp when it
/// is missing or malformed.
pub fn decode_state(
    start: Option<&str>,
    longest: Option<&str>,
    history: Option<&str>,
    now_ms: i64,
) -> Decoded {
    let start = decode_start(start);
    let longest = decode_longest(longest);
    let history = decode_history(history);

    let mut missing_keys = Vec::new();
    note_recovery(START_KEY, &start, &mut missing_keys);
    note_recovery(LONGEST_KEY, &longest, &mut missing_keys);
    note_recovery(HISTORY_KEY, &history, &mut missing_keys);

    let state = StreakState::from_parts(
        start.unwrap_or_else(|| now_ms),
        longest.unwrap_or_else(|| 0),
        history.unwrap_or_else(Vec::new),
    );

    Decoded {
        state,
        missing_keys,
    }
}

fn note_recovery<T>(key: &'static str, field: &Field<T>, missing: &mut Vec<&'static str>) {
    if let Field::Malformed(reason) = field {
        tracing::warn!(key, %reason, "malformed stored value, using default");
    }
    if field.is_missing() {
        missing.push(key);
    }
}

/// Encode the keys named in `keys` for a batch write.
pub fn encode_keys(
    state: &StreakState,
    keys: &[&'static str],
) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
    let mut entries = Vec::with_capacity(keys.len());
    for &key in keys {
        let value = match key {
            START_KEY => state.start_timestamp().to_string(),
            LONGEST_KEY => state.longest_streak().to_string(),
            HISTORY_KEY => serde_json::to_string(state.history())?,
            _ => continue,
        };
        entries.push((key, value));
    }
    Ok(entries)
}

pub fn encode_state(state: &StreakState) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
    encode_keys(state, &ALL_KEYS)
}
