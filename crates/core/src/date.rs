//! Calendar-date boundary: parsing clean dates and stripping time-of-day.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CleanTimeError, Result};

/// ISO-8601 calendar date format used at the boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Parse a `YYYY-MM-DD` clean date.
///
/// Surrounding whitespace is ignored. Anything else that is not a real
/// calendar date in exactly that shape is a `Format` error.
pub fn parse_start_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if !iso_date_pattern().is_match(trimmed) {
        return Err(CleanTimeError::Format {
            input: input.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| CleanTimeError::Format {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an optional clean date. Absent or blank input is the unset state.
pub fn parse_optional_start_date(input: Option<&str>) -> Result<StartDate> {
    match input.map(str::trim) {
        None | Some("") => Ok(StartDate::Unset),
        Some(s) => parse_start_date(s).map(StartDate::Set),
    }
}

/// Anything that can be reduced to a calendar date.
///
/// Time-of-day and timezone offset are dropped, so day counts never drift
/// across daylight-saving changes.
pub trait CalendarDate {
    /// The calendar date component.
    fn calendar_date(&self) -> NaiveDate;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDate for NaiveDateTime {
    fn calendar_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDate + ?Sized> CalendarDate for &T {
    fn calendar_date(&self) -> NaiveDate {
        (**self).calendar_date()
    }
}

/// Whether a clean date has been set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<NaiveDate>", into = "Option<NaiveDate>")]
pub enum StartDate {
    /// No clean date yet
    #[default]
    Unset,
    /// Clean date
    Set(NaiveDate),
}

impl StartDate {
    /// The date, or `UnsetStartDate`.
    pub fn require(&self) -> Result<NaiveDate> {
        match self {
            StartDate::Set(date) => Ok(*date),
            StartDate::Unset => Err(CleanTimeError::UnsetStartDate),
        }
    }

    /// The date, if set.
    pub fn get(&self) -> Option<NaiveDate> {
        match self {
            StartDate::Set(date) => Some(*date),
            StartDate::Unset => None,
        }
    }
}

impl From<Option<NaiveDate>> for StartDate {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(StartDate::Unset, StartDate::Set)
    }
}

impl From<StartDate> for Option<NaiveDate> {
    fn from(value: StartDate) -> Self {
        value.get()
    }
}

impl From<NaiveDate> for StartDate {
    fn from(value: NaiveDate) -> Self {
        StartDate::Set(value)
    }
}
