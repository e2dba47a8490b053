//! Turning extracted lines into validated work records.
//!
//! Line format: `DATE,START,END,ISSUE,"COMMENT"` with `DATE` as `YYYY-MM-DD`
//! and `START`/`END` as `HH:MM`. `END` may be empty for work in progress.
//! The comment is everything after the fourth comma.
//!
//! [`parse_all`] is a fold over the lines: the state is the last accepted
//! record, and a rejected line never replaces it.

use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, TiredError};
use crate::record::{RawRecord, RecordFields, WorkRecord};
use crate::validate::{check_chronology, check_fields, Rejection, Violation};

const FIELD_COUNT: usize = 5;
const MIDNIGHT: &str = "00:00";
const END_OF_DAY: &str = "23:59";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of parsing one batch of extracted lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    /// Records that passed every check, in file order.
    pub accepted: Vec<WorkRecord>,
    /// Lines that failed a recoverable check.
    pub rejected: Vec<Rejection>,
    /// Line numbers of entries without an end time.
    pub pending: Vec<usize>,
}

impl ParseOutcome {
    /// Number of rejected lines. Any non-zero value fails the batch.
    pub fn error_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn total_seconds(&self) -> i64 {
        self.accepted.iter().map(|r| r.duration_seconds).sum()
    }
}

/// Split a raw line into its five fields.
///
/// Quotes are stripped from the comment and an end time of `00:00` becomes
/// `23:59`, the last minute of the same day.
///
/// # Errors
///
/// Returns [`Violation::MalformedLine`] when the line has fewer than five
/// comma-separated fields.
pub fn split_fields(raw: &RawRecord) -> std::result::Result<RecordFields, Violation> {
    let parts: Vec<&str> = raw.text.splitn(FIELD_COUNT, ',').collect();
    let &[date, start, end, issue, comment] = parts.as_slice() else {
        return Err(Violation::MalformedLine { found: parts.len() });
    };

    // Midnight parses as the start of the day, not its end.
    let end_time = if end == MIDNIGHT { END_OF_DAY } else { end };

    Ok(RecordFields {
        line_number: raw.line_number,
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end_time.to_string(),
        issue: issue.to_string(),
        comment: comment.replace('"', ""),
    })
}

/// Resolve `"{date} {time}:00"` as civil time in `zone`.
///
/// An ambiguous local time (DST fall-back) resolves to the earlier instant.
/// A local time skipped by a DST jump does not exist and is an error; the
/// message names the wall-clock time it would be with the pre-jump offset.
fn parse_civil(date: &str, time: &str, zone: Tz, line: usize) -> Result<DateTime<Tz>> {
    let value = format!("{date} {time}:00");
    let naive = NaiveDateTime::parse_from_str(&value, DATETIME_FORMAT).map_err(|e| {
        TiredError::TimeParse {
            line,
            value: value.clone(),
            reason: e.to_string(),
        }
    })?;

    zone.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| TiredError::TimeParse {
            line,
            reason: format!(
                "local time does not exist in {}, it would be {} after the clock change",
                zone.name(),
                shift_over_gap(naive, zone).format("%H:%M")
            ),
            value,
        })
}

/// Read `naive` with the offset in force a day earlier, the way a clock that
/// missed the DST jump would.
fn shift_over_gap(naive: NaiveDateTime, zone: Tz) -> DateTime<Tz> {
    let before = zone
        .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
        .fix()
        .local_minus_utc();
    let utc = naive - TimeDelta::seconds(i64::from(before));
    Utc.from_utc_datetime(&utc).with_timezone(&zone)
}

/// Build a [`WorkRecord`] from structurally valid fields.
///
/// # Errors
///
/// Returns [`TiredError::TimeParse`] if the date or either time cannot be
/// read as a calendar date and time of day.
pub fn resolve_record(fields: RecordFields, zone: Tz) -> Result<WorkRecord> {
    let line = fields.line_number;
    let parsed_start = parse_civil(&fields.date, &fields.start_time, zone, line)?;
    let parsed_end = parse_civil(&fields.date, &fields.end_time, zone, line)?;
    let duration_seconds = (parsed_end - parsed_start).num_seconds();

    Ok(WorkRecord {
        line_number: line,
        date: fields.date,
        start_time: fields.start_time,
        end_time: fields.end_time,
        issue: fields.issue,
        comment: fields.comment,
        parsed_start,
        parsed_end,
        duration_seconds,
    })
}

fn reject(outcome: &mut ParseOutcome, line_number: usize, violations: Vec<Violation>) {
    for violation in &violations {
        tracing::error!(line = line_number, kind = ?violation.kind(), "{violation}");
    }
    outcome.rejected.push(Rejection {
        line_number,
        violations,
    });
}

/// Parse and validate a batch of extracted lines.
///
/// # Arguments
///
/// * `records`: lines from [`extract`](crate::extract::extract), in file order
/// * `zone`: the zone the timesheet's wall-clock times are written in
/// * `now`: the evaluation instant; accepted records must start in its year
///
/// Pending entries are listed but otherwise ignored. Lines that fail a
/// structural or chronology check are collected in
/// [`ParseOutcome::rejected`] and do not become the reference for the next
/// ordering check.
///
/// # Errors
///
/// Returns [`TiredError::TimeParse`] if a line passes the structural checks
/// but its date or times are not valid. The whole batch is abandoned.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tired_engine::extract::extract;
/// use tired_engine::parse::parse_all;
///
/// let lines = [">>> MARKER <<<", "2025-01-10,09:00,10:00,ABC-123,\"did work\""];
/// let raw = extract(&lines, ">>> MARKER <<<");
/// let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
/// let outcome = parse_all(&raw, chrono_tz::Tz::UTC, now).unwrap();
/// assert_eq!(outcome.error_count(), 0);
/// assert_eq!(outcome.accepted[0].duration_seconds, 3600);
/// ```
pub fn parse_all(records: &[RawRecord], zone: Tz, now: DateTime<Utc>) -> Result<ParseOutcome> {
    tracing::info!(count = records.len(), "Parsing actual work records.");
    let now = now.with_timezone(&zone);
    let mut outcome = ParseOutcome::default();

    for raw in records {
        let fields = match split_fields(raw) {
            Ok(fields) => fields,
            Err(violation) => {
                reject(&mut outcome, raw.line_number, vec![violation]);
                continue;
            }
        };

        if fields.is_pending() {
            tracing::warn!(line = fields.line_number, "End time field is empty, skipping.");
            outcome.pending.push(fields.line_number);
            continue;
        }

        let violations = check_fields(&fields);
        if !violations.is_empty() {
            reject(&mut outcome, fields.line_number, violations);
            continue;
        }

        let record = resolve_record(fields, zone)?;

        let violations = check_chronology(&record, outcome.accepted.last(), &now);
        if !violations.is_empty() {
            reject(&mut outcome, record.line_number, violations);
            continue;
        }

        tracing::debug!(
            line = record.line_number,
            issue = %record.issue,
            duration = record.duration_seconds,
            "Record fields."
        );
        outcome.accepted.push(record);
    }

    Ok(outcome)
}
