//! Availability declaration model.
//!
//! Part-time firefighters declare windows in which they are available or
//! unavailable. The absence of any declaration for a window is meaningful:
//! it places the employee in the standby pool.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The declared state for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityState {
    /// The employee can be called in.
    Available,
    /// The employee must not be scheduled.
    Unavailable,
}

/// A declaration made by an employee for a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDeclaration {
    /// The declaring employee.
    pub employee_id: String,
    /// Start of the declared window.
    pub start_time: NaiveDateTime,
    /// End of the declared window.
    pub end_time: NaiveDateTime,
    /// Declared state.
    pub state: AvailabilityState,
    /// When the declaration was submitted, if known.
    #[serde(default)]
    pub declared_at: Option<DateTime<Utc>>,
}

impl AvailabilityDeclaration {
    /// Returns true if the declaration window overlaps `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Returns true if the declaration was already known at `as_of`.
    ///
    /// Declarations without a submission timestamp are always visible.
    pub fn visible_at(&self, as_of: DateTime<Utc>) -> bool {
        self.declared_at.is_none_or(|declared| declared <= as_of)
    }
}
