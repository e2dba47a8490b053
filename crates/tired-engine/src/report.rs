//! Daily, weekly and monthly totals.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::record::WorkRecord;

/// Worked seconds in the periods containing the reference instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
}

/// Sum record durations by the day, ISO week and month of `now`.
///
/// A record counts towards a period when its start falls inside it; `now` is
/// read in the record's own zone.
pub fn aggregate(records: &[WorkRecord], now: DateTime<Utc>) -> Totals {
    records.iter().fold(Totals::default(), |mut totals, record| {
        let start = record.parsed_start;
        let local_now = now.with_timezone(&start.timezone());

        if start.date_naive() == local_now.date_naive() {
            totals.daily += record.duration_seconds;
        }
        if start.iso_week() == local_now.iso_week() {
            totals.weekly += record.duration_seconds;
        }
        if (start.year(), start.month()) == (local_now.year(), local_now.month()) {
            totals.monthly += record.duration_seconds;
        }
        totals
    })
}

/// The `YYYY-MM` boundary that makes [`extract`](crate::extract::extract)
/// return every line [`aggregate`] could count for `now`.
///
/// The current ISO week can begin in the previous month, so the boundary is
/// the month before whichever comes first: the first of this month or this
/// week's Monday.
pub fn report_boundary(now: DateTime<Utc>, zone: Tz) -> String {
    let today = now.with_timezone(&zone).date_naive();
    let month_start = first_of_month(today);
    let week_start = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
    let earliest = month_start.min(week_start);

    let previous_month = first_of_month(earliest).pred_opt().unwrap_or(earliest);
    previous_month.format("%Y-%m").to_string()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Format seconds as hours and minutes (e.g. `"7h 05m"`).
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    let hours = abs / 3600;
    let minutes = (abs % 3600) / 60;
    format!("{sign}{hours}h {minutes:02}m")
}
