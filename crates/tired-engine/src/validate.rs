//! Per-record and cross-record validation.
//!
//! Every check in a group runs even after an earlier one fails, so a single
//! pass over the timesheet reports everything wrong with a line.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::record::{RecordFields, WorkRecord};

static ISSUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_-]+-\d+$").expect("issue pattern compiles"));

/// Which family of checks a [`Violation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MalformedLine,
    Structural,
    Chronology,
}

/// A recoverable problem with one timesheet line.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    #[error("expected 5 comma-separated fields, found {found}")]
    MalformedLine { found: usize },

    #[error("some fields are empty, only the end time may be")]
    EmptyField,

    #[error("bad issue identifier '{issue}'")]
    BadIssue { issue: String },

    #[error("start time is not before end time ({seconds}s)")]
    NonPositiveDuration { seconds: i64 },

    #[error("record is from {record_year}, current year is {current_year}")]
    WrongYear { record_year: i32, current_year: i32 },

    #[error("start {start} is before the previous record's end {previous_end}")]
    Overlap {
        start: DateTime<Tz>,
        previous_end: DateTime<Tz>,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::MalformedLine { .. } => ViolationKind::MalformedLine,
            Violation::EmptyField | Violation::BadIssue { .. } => ViolationKind::Structural,
            Violation::NonPositiveDuration { .. }
            | Violation::WrongYear { .. }
            | Violation::Overlap { .. } => ViolationKind::Chronology,
        }
    }
}

/// A rejected line and every reason it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub line_number: usize,
    pub violations: Vec<Violation>,
}

/// Whether `issue` looks like a tracker key such as `ABC-123`.
pub fn is_valid_issue(issue: &str) -> bool {
    ISSUE_PATTERN.is_match(issue)
}

/// Structural checks that need nothing but the line itself.
pub fn check_fields(fields: &RecordFields) -> Vec<Violation> {
    let mut violations = Vec::new();

    let any_empty = [
        &fields.date,
        &fields.start_time,
        &fields.end_time,
        &fields.issue,
        &fields.comment,
    ]
    .iter()
    .any(|f| f.is_empty());
    if any_empty {
        violations.push(Violation::EmptyField);
    }

    if !is_valid_issue(&fields.issue) {
        violations.push(Violation::BadIssue {
            issue: fields.issue.clone(),
        });
    }

    violations
}

/// Chronology checks against the previously accepted record.
///
/// `previous` is `None` before the first accepted record, in which case the
/// ordering check always passes. `now` decides which calendar year is
/// acceptable; it is compared in the record's own zone.
pub fn check_chronology(
    record: &WorkRecord,
    previous: Option<&WorkRecord>,
    now: &DateTime<Tz>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if record.duration_seconds <= 0 {
        violations.push(Violation::NonPositiveDuration {
            seconds: record.duration_seconds,
        });
    }

    let record_year = record.parsed_start.year();
    let current_year = now.with_timezone(&record.parsed_start.timezone()).year();
    if record_year != current_year {
        violations.push(Violation::WrongYear {
            record_year,
            current_year,
        });
    }

    if let Some(prev) = previous {
        if record.parsed_start < prev.parsed_end {
            violations.push(Violation::Overlap {
                start: record.parsed_start,
                previous_end: prev.parsed_end,
            });
        }
    }

    violations
}
