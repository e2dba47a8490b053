pub mod check;
pub mod report;
pub mod submit;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tired_engine::{extract, parse_all, ParseOutcome};

use crate::timesheet;

/// Settings shared by every subcommand.
pub struct Context {
    pub timesheet: PathBuf,
    pub zone: Tz,
    pub now: DateTime<Utc>,
    pub marker: String,
    pub json: bool,
}

impl Context {
    pub fn read_lines(&self) -> anyhow::Result<Vec<String>> {
        let lines = timesheet::read_timesheet(&self.timesheet)?;
        tracing::info!(number = lines.len(), "Timesheet file total lines number.");
        Ok(lines)
    }

    /// Extract the lines below `boundary` and parse them.
    pub fn parse_batch(&self, lines: &[String], boundary: &str) -> anyhow::Result<ParseOutcome> {
        let raw = extract(lines, boundary);
        tracing::info!(number = raw.len(), "Actual work records number.");
        Ok(parse_all(&raw, self.zone, self.now)?)
    }
}
