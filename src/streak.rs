//! Weekly date-night streaks.

use crate::models::DateNightRecord;
use chrono::{DateTime, Duration, Utc};

/// Most recent date night must be within a week of `now` for a live streak.
fn inactivity_limit() -> Duration {
    Duration::days(7)
}

/// Accepted spacing between consecutive date nights: half a week to two weeks.
fn cadence_window() -> (Duration, Duration) {
    (Duration::hours(84), Duration::days(14))
}

/// Counts consecutive weekly-cadence date nights walking back from the
/// newest one. `history` must be newest-first.
pub fn compute_streak(history: &[DateNightRecord], now: DateTime<Utc>) -> u32 {
    let Some(newest) = history.first() else {
        return 0;
    };

    let mut last_date = newest.date;
    if now - last_date > inactivity_limit() {
        return 0;
    }

    let (min_gap, max_gap) = cadence_window();
    let mut streak = 1;

    for night in &history[1..] {
        let gap = last_date - night.date;
        if gap < min_gap || gap > max_gap {
            break;
        }
        streak += 1;
        last_date = night.date;
    }

    streak
}
