//! Error types for tired-engine operations.
//!
//! Only conditions that make the whole run meaningless live here. Problems
//! with a single timesheet line are [`Violation`](crate::validate::Violation)s
//! and are returned alongside the accepted records instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TiredError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid datetime on line {line}: '{value}': {reason}")]
    TimeParse {
        line: usize,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TiredError>;
