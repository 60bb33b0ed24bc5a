//! Countdowns for the partner profile: the anniversary and the next event.

use crate::models::{EventRecord, RecurringFrequency};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingEvent {
    #[serde(flatten)]
    pub event: EventRecord,
    pub occurs_at: DateTime<Utc>,
    /// Calendar days (UTC) from `now` to `occurs_at`.
    pub days_until: i64,
}

/// The anniversary in `year`. A Feb 29 anniversary falls on Mar 1 in
/// common years.
fn anniversary_in(anniversary: NaiveDate, year: i32) -> Option<NaiveDate> {
    anniversary
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Calendar days until the next anniversary; 0 on the day itself.
pub fn days_until_anniversary(anniversary: NaiveDate, now: DateTime<Utc>) -> Option<i64> {
    let today = now.date_naive();

    let mut next = anniversary_in(anniversary, today.year())?;
    if next < today {
        next = anniversary_in(anniversary, today.year() + 1)?;
    }

    Some((next - today).num_days())
}

/// First occurrence of `event` strictly after `now`. One-off events in the
/// past have none.
pub fn next_occurrence(event: &EventRecord, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if event.date > now {
        return Some(event.date);
    }

    let frequency = match (event.is_recurring, event.recurring_frequency) {
        (true, Some(frequency)) => frequency,
        _ => return None,
    };

    let step = match frequency {
        RecurringFrequency::Weekly => {
            let weeks = (now - event.date).num_weeks() + 1;
            return Some(event.date + Duration::weeks(weeks));
        }
        RecurringFrequency::Monthly => 1,
        RecurringFrequency::Yearly => 12,
    };

    // Offsets are always taken from the original date so a Jan 31 monthly
    // event goes back to the 31st after a short month.
    let elapsed_months = (now.year() - event.date.year()) as i64 * 12
        + now.month() as i64
        - event.date.month() as i64;
    let mut months = u32::try_from(elapsed_months.max(0) / step * step).ok()?;

    loop {
        let candidate = event.date.checked_add_months(Months::new(months))?;
        if candidate > now {
            return Some(candidate);
        }
        months = months.checked_add(step as u32)?;
    }
}

/// The soonest upcoming event, expanding recurring ones.
pub fn next_event(events: &[EventRecord], now: DateTime<Utc>) -> Option<UpcomingEvent> {
    events
        .iter()
        .filter_map(|event| next_occurrence(event, now).map(|at| (event, at)))
        .min_by_key(|(_, at)| *at)
        .map(|(event, occurs_at)| UpcomingEvent {
            event: event.clone(),
            occurs_at,
            days_until: (occurs_at.date_naive() - now.date_naive()).num_days(),
        })
}
