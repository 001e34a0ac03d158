//! Clean-time core data models.
//!
//! This crate defines the milestone catalog, the derived milestone status,
//! and the calendar-date boundary that every clean-time query builds on.

#![warn(missing_docs)]

mod catalog;
mod date;
mod error;
mod milestone;

pub use catalog::MilestoneCatalog;
pub use date::{parse_optional_start_date, parse_start_date, CalendarDate, StartDate, DATE_FORMAT};
pub use error::{CatalogError, CleanTimeError, Result};
pub use milestone::{Milestone, MilestoneStatus, MilestoneTier};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
