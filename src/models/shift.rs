//! Shift type and shift slot models.
//!
//! A [`ShiftType`] comes from the shift-type catalog and carries the Tier-0
//! processing priority. A [`ShiftSlot`] is one required staffing position on
//! one shift instance of the roster.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a slot's current occupant was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Placed by an operator. Never written by the engine.
    Manual,
    /// Placed by the attribution engine.
    Auto,
    /// No occupant yet.
    Unfilled,
}

/// A shift type from the catalog (e.g., "day watch", "night watch").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    /// Unique identifier of the shift type.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tier-0 processing priority; lower values are processed first.
    pub priority: u32,
    /// Competencies every slot of this type requires.
    #[serde(default)]
    pub required_competencies: BTreeSet<String>,
    /// Whether every slot of this type requires an officer.
    #[serde(default)]
    pub officer_required: bool,
}

/// A single staffing position on a shift instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// Unique identifier for the slot.
    pub id: String,
    /// Reference to the slot's [`ShiftType`].
    pub shift_type_id: String,
    /// Competencies required by this position in addition to the shift type's.
    #[serde(default)]
    pub required_competencies: BTreeSet<String>,
    /// Whether this position requires an officer.
    #[serde(default)]
    pub officer_required: bool,
    /// Start of the slot.
    pub start_time: NaiveDateTime,
    /// End of the slot.
    pub end_time: NaiveDateTime,
    /// Current occupant, if any.
    #[serde(default)]
    pub occupant: Option<String>,
    /// How the occupant was placed.
    pub source: AssignmentSource,
}

impl ShiftSlot {
    /// Returns the slot duration in hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_attribution::models::{AssignmentSource, ShiftSlot};
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let slot = ShiftSlot {
    ///     id: "slot_001".to_string(),
    ///     shift_type_id: "day".to_string(),
    ///     required_competencies: Default::default(),
    ///     officer_required: false,
    ///     start_time: NaiveDateTime::parse_from_str("2026-03-02 07:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     end_time: NaiveDateTime::parse_from_str("2026-03-02 19:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     occupant: None,
    ///     source: AssignmentSource::Unfilled,
    /// };
    /// assert_eq!(slot.duration_hours(), Decimal::new(125, 1));
    /// ```
    pub fn duration_hours(&self) -> Decimal {
        let minutes = (self.end_time - self.start_time).num_minutes();
        Decimal::new(minutes, 0) / Decimal::new(60, 0)
    }

    /// Returns the calendar date the slot starts on.
    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Returns true if the slot's window overlaps `[start, end)`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Returns true if an operator placed this assignment.
    pub fn is_manual(&self) -> bool {
        self.source == AssignmentSource::Manual
    }

    /// Returns true if the engine should try to fill this slot.
    ///
    /// Manual slots are never touched; occupied auto slots are left alone.
    pub fn needs_filling(&self) -> bool {
        !self.is_manual() && self.occupant.is_none()
    }
}

/// A slot mutation written back to the roster after a run.
///
/// Uses the same update path as manual edits, tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// The slot to update.
    pub slot_id: String,
    /// The new occupant.
    pub employee_id: String,
    /// The source tag written with the occupant.
    pub source: AssignmentSource,
}
