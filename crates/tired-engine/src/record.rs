//! Timesheet record types.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

/// A candidate timesheet line, trimmed, never blank and never a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    /// 1-based position in the source text.
    pub line_number: usize,
    pub text: String,
}

/// The five comma-separated fields of a timesheet line.
///
/// `end_time` already has the midnight rollover applied and `comment` has its
/// quote characters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub line_number: usize,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub issue: String,
    pub comment: String,
}

impl RecordFields {
    /// Work still in progress: no end time written yet.
    pub fn is_pending(&self) -> bool {
        self.end_time.is_empty()
    }
}

/// A parsed work session, ready for reporting or submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkRecord {
    pub line_number: usize,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub issue: String,
    pub comment: String,
    pub parsed_start: DateTime<Tz>,
    pub parsed_end: DateTime<Tz>,
    pub duration_seconds: i64,
}
