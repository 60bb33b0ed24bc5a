//! Cycle phase inference.
//!
//! Everything here is a pure function of a user's period history (newest
//! first) and a caller-supplied `now`. Nothing is cached between calls.

use crate::models::{PeriodRecord, PhaseResult};
use chrono::{DateTime, Utc};

pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// An open period older than this many days no longer counts as menstrual
/// on its own.
const ACTIVE_PERIOD_WINDOW: i64 = 7;
/// Gaps between starts must fall strictly inside (0, 45) to count.
const MAX_PLAUSIBLE_GAP: i64 = 45;
const FOLLICULAR_UNTIL: i64 = 8;
const OVULATORY_UNTIL: i64 = 14;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days from `earlier` to `later`, rounded toward negative infinity.
pub(crate) fn floor_days(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().div_euclid(MS_PER_DAY)
}

/// The most recently started record with no end date.
pub fn active_period(history: &[PeriodRecord]) -> Option<&PeriodRecord> {
    history.iter().find(|p| p.is_active())
}

/// Mean gap between adjacent start dates, ignoring implausible gaps.
pub fn average_cycle_length(history: &[PeriodRecord]) -> i64 {
    let gaps: Vec<i64> = history
        .windows(2)
        .map(|pair| floor_days(pair[0].start_date, pair[1].start_date))
        .filter(|gap| *gap > 0 && *gap < MAX_PLAUSIBLE_GAP)
        .collect();

    if gaps.is_empty() {
        return DEFAULT_CYCLE_LENGTH;
    }

    let total: i64 = gaps.iter().sum();
    (total as f64 / gaps.len() as f64).round() as i64
}

pub fn compute_phase(history: &[PeriodRecord], now: DateTime<Utc>) -> PhaseResult {
    let Some(latest) = history.first() else {
        return PhaseResult::Unknown;
    };

    if let Some(active) = active_period(history) {
        let days_since_start = floor_days(now, active.start_date);
        if days_since_start <= ACTIVE_PERIOD_WINDOW {
            tracing::trace!(period_id = %active.id, days_since_start, "active period short-circuit");
            return PhaseResult::Menstrual { days_in: days_since_start };
        }
    }

    let avg_cycle_length = average_cycle_length(history);

    let latest_start = latest.start_date;
    let period_end = latest.end_date.unwrap_or(latest_start);

    let days_since_ended = floor_days(now, period_end);
    let days_since_started = floor_days(now, latest_start);
    let days_until_next = (avg_cycle_length - days_since_started).max(0);

    tracing::debug!(
        avg_cycle_length,
        days_since_ended,
        days_since_started,
        "classifying cycle position"
    );

    if days_since_ended < 0 {
        PhaseResult::Menstrual { days_in: days_since_started }
    } else if days_since_ended <= FOLLICULAR_UNTIL {
        PhaseResult::Follicular { days_in: days_since_ended, days_until: days_until_next }
    } else if days_since_ended <= OVULATORY_UNTIL {
        PhaseResult::Ovulatory { days_in: days_since_ended, days_until: days_until_next }
    } else if days_since_started <= avg_cycle_length {
        PhaseResult::Luteal {
            days_in: days_since_ended,
            days_until: (avg_cycle_length - days_since_started).max(1),
        }
    } else {
        PhaseResult::Late { days_late: days_since_started - avg_cycle_length }
    }
}
