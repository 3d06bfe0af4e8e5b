//! Decomposition of a millisecond delta into days/hours/minutes/seconds.

use serde::{Deserialize, Serialize};

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Elapsed time split into whole units. Every component is floored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Elapsed {
    /// Split `delta_ms` into components. Negative deltas (a clock that moved
    /// backwards) clamp to zero.
    pub fn from_millis(delta_ms: i64) -> Self {
        let delta = delta_ms.max(0);
        Self {
            days: (delta / MS_PER_DAY) as u64,
            hours: ((delta % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((delta % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((delta % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
        }
    }

    pub fn between(start_ms: i64, now_ms: i64) -> Self {
        Self::from_millis(now_ms.saturating_sub(start_ms))
    }

    /// The delta this value represents, truncated to the whole second.
    pub fn as_millis(&self) -> i64 {
        self.days as i64 * MS_PER_DAY
            + self.hours as i64 * MS_PER_HOUR
            + self.minutes as i64 * MS_PER_MINUTE
            + self.seconds as i64 * MS_PER_SECOND
    }
}

/// Whole days between two epoch-millisecond instants, clamped at zero.
pub fn whole_days(start_ms: i64, now_ms: i64) -> u64 {
    (now_ms.saturating_sub(start_ms).max(0) / MS_PER_DAY) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decomposes_mixed_delta() {
        let delta = 3 * MS_PER_DAY + 4 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 6 * MS_PER_SECOND + 999;
        assert_eq!(
            Elapsed::from_millis(delta),
            Elapsed {
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6
            }
        );
    }

    #[test]
    fn just_under_a_day_is_zero_days() {
        let e = Elapsed::from_millis(MS_PER_DAY - 1);
        assert_eq!(e.days, 0);
        assert_eq!((e.hours, e.minutes, e.seconds), (23, 59, 59));
    }

    #[test]
    fn negative_delta_clamps_to_zero() {
        assert_eq!(Elapsed::between(10_000, 5_000), Elapsed::default());
        assert_eq!(whole_days(10_000, 5_000), 0);
    }

    #[test]
    fn whole_days_floors() {
        assert_eq!(whole_days(0, 3 * MS_PER_DAY + 5_000), 3);
        assert_eq!(whole_days(0, 2 * MS_PER_DAY - 1), 1);
    }

    proptest! {
        #[test]
        fn components_stay_in_range(delta in 0i64..(10_000 * MS_PER_DAY)) {
            let e = Elapsed::from_millis(delta);
            prop_assert!(e.hours <= 23);
            prop_assert!(e.minutes <= 59);
            prop_assert!(e.seconds <= 59);
            prop_assert!(e.as_millis() <= delta);
            prop_assert!(delta < e.as_millis() + MS_PER_SECOND);
            prop_assert_eq!(e.days, whole_days(0, delta));
        }
    }
}
