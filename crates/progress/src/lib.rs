//! Clean-time progress tracking.
//!
//! Elapsed clean days, milestone status, progress toward the next milestone,
//! and projected milestone dates.

#![warn(missing_docs)]

pub mod calculator;
pub mod tracker;

pub use calculator::{
    achieved_count, checked_elapsed_days, elapsed_days, is_achieved, milestone_statuses,
    next_milestone, progress_to_next, projected_date, status_for, summarize, CleanTimeSummary,
};
pub use tracker::{CleanTimeTracker, ProgressSnapshot, TrackerConfig, TrackerError};
