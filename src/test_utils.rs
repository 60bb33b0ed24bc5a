//! Fixtures shared by the unit tests.
//!
//! Every instant is expressed as a day offset from a fixed noon-UTC epoch so
//! tests read like the scenarios they encode ("start day 0, end day 5").

use crate::models::{DateNightRecord, EventRecord, PeriodRecord, RecurringFrequency};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

pub fn user() -> Uuid {
    Uuid::from_u128(0x5eed)
}

/// Noon on 2024-03-01, UTC.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn day(offset: i64) -> DateTime<Utc> {
    epoch() + Duration::days(offset)
}

pub fn hours(offset: i64) -> DateTime<Utc> {
    epoch() + Duration::hours(offset)
}

pub fn period_at(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> PeriodRecord {
    PeriodRecord {
        id: Uuid::new_v4(),
        user_id: user(),
        start_date: start,
        end_date: end,
        flow: None,
        symptoms: Vec::new(),
        notes: None,
        created_at: start,
    }
}

pub fn period(start: i64, end: Option<i64>) -> PeriodRecord {
    period_at(day(start), end.map(day))
}

pub fn date_night_at(date: DateTime<Utc>) -> DateNightRecord {
    DateNightRecord {
        id: Uuid::new_v4(),
        user_id: user(),
        date,
        notes: None,
        location: None,
        activity: None,
        created_at: date,
    }
}

/// Date nights at the given day offsets, returned newest-first.
pub fn date_nights(days: &[i64]) -> Vec<DateNightRecord> {
    let mut nights: Vec<_> = days.iter().map(|&d| date_night_at(day(d))).collect();
    nights.sort_by(|a, b| b.date.cmp(&a.date));
    nights
}

pub fn event_at(date: DateTime<Utc>, frequency: Option<RecurringFrequency>) -> EventRecord {
    EventRecord {
        id: Uuid::new_v4(),
        user_id: user(),
        title: "Dinner".into(),
        date,
        description: None,
        is_recurring: frequency.is_some(),
        recurring_frequency: frequency,
        created_at: date,
    }
}
