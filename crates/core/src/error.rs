//! Error taxonomy for clean-time queries and catalog configuration.

use chrono::NaiveDate;

/// Result type for clean-time queries.
pub type Result<T> = std::result::Result<T, CleanTimeError>;

/// Errors surfaced by clean-time queries.
///
/// All variants are local and recoverable: re-running the query with
/// corrected input is the only "retry" there is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanTimeError {
    /// No clean date has been set yet
    #[error("no clean date set")]
    UnsetStartDate,

    /// The reference date falls before the clean date
    #[error("clean date {start} is after reference date {reference} ({elapsed_days} days)")]
    InvalidRange {
        /// Clean date
        start: NaiveDate,
        /// Date the query was evaluated against
        reference: NaiveDate,
        /// Raw (negative) elapsed day count
        elapsed_days: i64,
    },

    /// Date input could not be parsed
    #[error("invalid date {input:?}: {reason}")]
    Format {
        /// Raw input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Date arithmetic left chrono's supported range
    #[error("{start} + {days} days is out of range")]
    DateOutOfRange {
        /// Clean date
        start: NaiveDate,
        /// Day offset
        days: u32,
    },
}

impl CleanTimeError {
    /// Whether this error means "no date set" rather than bad data.
    pub fn is_unset(&self) -> bool {
        matches!(self, CleanTimeError::UnsetStartDate)
    }
}

/// Errors raised while building a milestone catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog has no entries
    #[error("milestone catalog is empty")]
    Empty,

    /// Thresholds are out of order
    #[error("milestone thresholds out of order: {next} follows {previous}")]
    NotAscending {
        /// Preceding threshold
        previous: u32,
        /// Offending threshold
        next: u32,
    },

    /// Two entries share a threshold
    #[error("duplicate milestone threshold: {0}")]
    Duplicate(u32),

    /// Catalog document could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
