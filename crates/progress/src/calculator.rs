//! Clean-time calculator.
//!
//! Pure functions over a clean date, a reference date and a milestone
//! catalog. Nothing here reads the wall clock or keeps state between calls;
//! the reference date is always an explicit argument.

use chrono::{Days, NaiveDate};
use cleantime_core::{
    CalendarDate, CleanTimeError, Milestone, MilestoneCatalog, MilestoneStatus, Result, StartDate,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whole calendar days from `start` to `reference`.
///
/// Fails with `UnsetStartDate` when no clean date is set. A reference date
/// before the clean date yields a negative count, unclamped.
pub fn elapsed_days(start: impl Into<StartDate>, reference: impl CalendarDate) -> Result<i64> {
    let start = start.into().require()?;
    Ok(days_between(start, reference.calendar_date()))
}

fn days_between(start: NaiveDate, reference: NaiveDate) -> i64 {
    reference.signed_duration_since(start).num_days()
}

/// Elapsed days, surfacing a future clean date as `InvalidRange`.
pub fn checked_elapsed_days(
    start: impl Into<StartDate>,
    reference: impl CalendarDate,
) -> Result<i64> {
    let start = start.into().require()?;
    let reference = reference.calendar_date();
    let elapsed = days_between(start, reference);
    if elapsed < 0 {
        return Err(CleanTimeError::InvalidRange {
            start,
            reference,
            elapsed_days: elapsed,
        });
    }
    Ok(elapsed)
}

/// Whether `elapsed_days` reaches the milestone threshold.
pub fn is_achieved(milestone: &Milestone, elapsed_days: i64) -> bool {
    elapsed_days >= i64::from(milestone.threshold_days)
}

/// Status of one milestone for a clean date and elapsed count.
pub fn status_for(
    milestone: &Milestone,
    elapsed_days: i64,
    start: NaiveDate,
) -> Result<MilestoneStatus> {
    Ok(MilestoneStatus {
        milestone: milestone.clone(),
        achieved: is_achieved(milestone, elapsed_days),
        date: projected_date(start, milestone.threshold_days)?,
    })
}

/// First milestone not yet reached.
///
/// Once every threshold has been reached this is the catalog's last entry,
/// so there is always a milestone to show.
pub fn next_milestone(catalog: &MilestoneCatalog, elapsed_days: i64) -> &Milestone {
    catalog
        .iter()
        .find(|m| i64::from(m.threshold_days) > elapsed_days)
        .unwrap_or_else(|| catalog.last())
}

/// Percentage of the way from the previous milestone to the next, in `0..=100`.
///
/// The previous milestone is the largest threshold below the next one, or a
/// floor of zero days. Rounds half up. Saturates at 100 once every threshold
/// is reached, and reads 0 before the clean date.
pub fn progress_to_next(catalog: &MilestoneCatalog, elapsed_days: i64) -> u8 {
    if elapsed_days < 0 {
        return 0;
    }
    if is_achieved(catalog.last(), elapsed_days) {
        return 100;
    }

    let next = next_milestone(catalog, elapsed_days);
    let floor = catalog
        .iter()
        .take_while(|m| m.threshold_days < next.threshold_days)
        .last()
        .map_or(0, |m| i64::from(m.threshold_days));

    // next > elapsed >= floor, so span > 0
    let span = i64::from(next.threshold_days) - floor;
    let done = elapsed_days - floor;
    let percent = round_half_up(100 * done, span);

    percent.clamp(0, 100) as u8
}

/// `numerator / denominator` rounded half up, for a positive denominator.
fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

/// Clean date plus `threshold_days`.
///
/// The same date reads as "achieved on" or "expected on" depending on status.
pub fn projected_date(start: NaiveDate, threshold_days: u32) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(threshold_days)))
        .ok_or(CleanTimeError::DateOutOfRange {
            start,
            days: threshold_days,
        })
}

/// Number of milestones reached.
pub fn achieved_count(catalog: &MilestoneCatalog, elapsed_days: i64) -> usize {
    catalog
        .iter()
        .take_while(|m| is_achieved(m, elapsed_days))
        .count()
}

/// Status of every catalog entry, in catalog order.
pub fn milestone_statuses(
    catalog: &MilestoneCatalog,
    start: impl Into<StartDate>,
    reference: impl CalendarDate,
) -> Result<Vec<MilestoneStatus>> {
    let start: StartDate = start.into();
    let elapsed = checked_elapsed_days(start, reference)?;
    let start = start.require()?;

    catalog
        .iter()
        .map(|m| status_for(m, elapsed, start))
        .collect()
}

/// Summary view: clean time plus the next milestone and progress toward it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanTimeSummary {
    /// Clean date
    pub start_date: NaiveDate,

    /// Date the summary was computed for
    pub reference_date: NaiveDate,

    /// Whole days clean
    pub elapsed_days: i64,

    /// Next milestone (last entry once all are reached)
    pub next: MilestoneStatus,

    /// Progress toward `next`, 0-100
    pub progress: u8,

    /// Days until `next`, 0 once reached
    pub days_remaining: i64,

    /// Milestones reached so far
    pub achieved_count: usize,

    /// Every milestone in the catalog has been reached
    pub catalog_complete: bool,
}

/// Compute the summary view.
pub fn summarize(
    catalog: &MilestoneCatalog,
    start: impl Into<StartDate>,
    reference: impl CalendarDate,
) -> Result<CleanTimeSummary> {
    let start: StartDate = start.into();
    let reference = reference.calendar_date();
    let elapsed = checked_elapsed_days(start, reference)?;
    let start = start.require()?;

    let next = status_for(next_milestone(catalog, elapsed), elapsed, start)?;
    let progress = progress_to_next(catalog, elapsed);
    let days_remaining = (i64::from(next.milestone.threshold_days) - elapsed).max(0);
    let achieved_count = achieved_count(catalog, elapsed);

    debug!(
        "Clean time {} days since {}: next {} ({}%)",
        elapsed, start, next.milestone.name, progress
    );

    Ok(CleanTimeSummary {
        start_date: start,
        reference_date: reference,
        elapsed_days: elapsed,
        next,
        progress,
        days_remaining,
        achieved_count,
        catalog_complete: achieved_count == catalog.len(),
    })
}
