//! Scheduling horizon model.
//!
//! This module contains the [`Horizon`] type bounding an attribution run.

use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The date range an attribution run covers.
///
/// A slot belongs to the horizon when it starts on a date within the range.
///
/// # Example
///
/// ```
/// use shift_attribution::models::Horizon;
/// use chrono::NaiveDate;
///
/// let horizon = Horizon {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
/// };
///
/// assert!(horizon.contains_date(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())); // start date
/// assert!(horizon.contains_date(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap())); // end date
/// assert!(!horizon.contains_date(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap())); // after
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Horizon {
    /// The first date of the horizon (inclusive).
    pub start_date: NaiveDate,
    /// The last date of the horizon (inclusive).
    pub end_date: NaiveDate,
}

impl Horizon {
    /// Creates a horizon from its inclusive bounds.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Returns true if the horizon contains no date.
    pub fn is_empty(&self) -> bool {
        self.end_date < self.start_date
    }

    /// Checks if a given date falls within the horizon (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the first instant of the horizon.
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    /// Returns the instant just after the horizon (exclusive bound).
    pub fn end_time(&self) -> NaiveDateTime {
        self.end_date
            .checked_add_days(Days::new(1))
            .unwrap_or(self.end_date)
            .and_time(NaiveTime::MIN)
    }

    /// Returns true if two horizons share at least one date.
    pub fn overlaps(&self, other: &Horizon) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date, self.end_date)
    }
}
