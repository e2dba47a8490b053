//! Marker-bounded extraction of new timesheet lines.
//!
//! A timesheet grows at the bottom. Everything above the canonical marker has
//! already been submitted, so the interesting part is the tail below it. The
//! same backward sweep also answers report queries, where the boundary is a
//! date prefix such as `"2025-01"` instead of the marker.

use crate::record::RawRecord;

/// The line separating submitted entries from new ones.
pub const CANONICAL_MARKER: &str = ">>> TIRED <<<";

/// Collect the non-blank, non-comment lines below the last `boundary` line.
///
/// Walks from the end of `lines` towards the start and stops at the first
/// trimmed line beginning with `boundary`. Lines beginning with
/// [`CANONICAL_MARKER`] are skipped even when `boundary` is something else.
/// If no boundary line exists, every candidate line in the file is returned.
///
/// Records come back in file order with 1-based line numbers.
///
/// # Examples
///
/// ```
/// use tired_engine::extract::{extract, CANONICAL_MARKER};
///
/// let lines = [
///     "2025-01-09,09:00,10:00,ABC-1,\"old\"",
///     CANONICAL_MARKER,
///     "# lunch",
///     "2025-01-10,09:00,10:00,ABC-2,\"new\"",
/// ];
/// let records = extract(&lines, CANONICAL_MARKER);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].line_number, 4);
/// ```
pub fn extract<S: AsRef<str>>(lines: &[S], boundary: &str) -> Vec<RawRecord> {
    tracing::info!("Looking for actual work records.");
    let mut records = Vec::new();

    for (index, line) in lines.iter().enumerate().rev() {
        let text = line.as_ref().trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        if text.starts_with(boundary) {
            break;
        }

        if text.starts_with(CANONICAL_MARKER) {
            continue;
        }

        let record = RawRecord {
            line_number: index + 1,
            text: text.to_string(),
        };
        tracing::debug!(line = record.line_number, text = %record.text, "New work record.");
        records.push(record);
    }

    records.reverse();
    records
}

/// Move `marker` to the end of the timesheet.
///
/// Every line equal to `marker` (ignoring surrounding whitespace) is dropped
/// and a single marker line is appended, so that everything currently in the
/// file counts as submitted.
pub fn relocate_marker<S: AsRef<str>>(lines: &[S], marker: &str) -> Vec<String> {
    relocate_marker_before(lines, marker, lines.len() + 1)
}

/// Move `marker` directly above the 1-based `line_number`.
///
/// Used when an unfinished entry must stay below the marker. A `line_number`
/// past the end appends the marker, like [`relocate_marker`].
pub fn relocate_marker_before<S: AsRef<str>>(
    lines: &[S],
    marker: &str,
    line_number: usize,
) -> Vec<String> {
    let position = line_number.max(1);
    let mut out = Vec::with_capacity(lines.len() + 1);

    for (index, line) in lines.iter().enumerate() {
        if index + 1 == position {
            out.push(marker.to_string());
        }
        let line = line.as_ref();
        if line.trim() != marker {
            out.push(line.to_string());
        }
    }
    if position > lines.len() {
        out.push(marker.to_string());
    }
    out
}
