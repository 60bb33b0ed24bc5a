//! Per-day calendar highlights for logged periods.

use crate::models::PeriodRecord;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// An open period is drawn for at most this many days after its start.
const OPEN_PERIOD_EXTRA_DAYS: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DayMarker {
    pub starting_day: bool,
    pub ending_day: bool,
}

impl DayMarker {
    const INTERIOR: Self = Self { starting_day: false, ending_day: false };
    const START: Self = Self { starting_day: true, ending_day: false };
    const END: Self = Self { starting_day: false, ending_day: true };
    const SINGLE: Self = Self { starting_day: true, ending_day: true };
}

/// Calendar day -> marker. Serializes with `YYYY-MM-DD` keys.
pub type MarkedDates = BTreeMap<NaiveDate, DayMarker>;

/// Expands each period into per-day markers. Days are UTC calendar days.
/// Later records overwrite earlier ones on shared dates.
pub fn build_markers(history: &[PeriodRecord], now: DateTime<Utc>) -> MarkedDates {
    let mut marked = MarkedDates::new();

    for record in history {
        let start = record.start_date.date_naive();

        match record.end_date.map(|end| end.date_naive()) {
            Some(end) if end == start => {
                marked.insert(start, DayMarker::SINGLE);
            }
            Some(end) => {
                marked.insert(start, DayMarker::START);
                marked.insert(end, DayMarker::END);
                for date in days_between(start, end) {
                    marked.insert(date, DayMarker::INTERIOR);
                }
            }
            None => {
                marked.insert(start, DayMarker::START);
                let cap = start + Duration::days(OPEN_PERIOD_EXTRA_DAYS);
                let last = now.date_naive().min(cap);
                let mut date = start + Duration::days(1);
                while date <= last {
                    marked.insert(date, DayMarker::INTERIOR);
                    date += Duration::days(1);
                }
            }
        }
    }

    marked
}

/// Days strictly between `start` and `end`; empty when `end <= start`.
fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .skip(1)
        .take_while(move |date| *date < end)
}
