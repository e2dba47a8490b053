//! # tired-engine
//!
//! Extraction and validation of hand-written timesheets.
//!
//! A timesheet is an append-only text file with one work session per line:
//!
//! ```text
//! 2025-01-10,09:00,10:30,ABC-123,"Code review"
//! >>> TIRED <<<
//! 2025-01-10,10:30,12:00,ABC-124,"Release notes"
//! 2025-01-10,13:00,,ABC-125,"Still going"
//! ```
//!
//! Lines below the marker are new. The engine finds them, parses each into a
//! [`WorkRecord`], and rejects anything that is malformed, overlaps the
//! previous record or belongs to another year. Nothing here reads the clock,
//! the filesystem (apart from [`zone::resolve_time_zone`]) or the network;
//! the caller supplies "now".
//!
//! ## Modules
//!
//! - [`zone`]: Time zone resolution for naive wall-clock values
//! - [`extract`]: Marker-bounded tail extraction
//! - [`record`]: Raw lines, split fields and parsed work records
//! - [`parse`]: Field splitting, timestamp resolution, batch validation
//! - [`validate`]: Structural and chronology checks
//! - [`report`]: Daily/weekly/monthly aggregation
//! - [`error`]: Error types

pub mod error;
pub mod extract;
pub mod parse;
pub mod record;
pub mod report;
pub mod validate;
pub mod zone;

pub use error::TiredError;
pub use extract::{extract, relocate_marker, relocate_marker_before, CANONICAL_MARKER};
pub use parse::{parse_all, ParseOutcome};
pub use record::{RawRecord, RecordFields, WorkRecord};
pub use report::{aggregate, format_duration, report_boundary, Totals};
pub use validate::{Rejection, Violation, ViolationKind};
pub use zone::{parse_timezone, resolve_time_zone, resolve_time_zone_with};
