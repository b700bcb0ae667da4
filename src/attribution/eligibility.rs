//! Eligibility classification.
//!
//! Decides whether an employee may be considered for a slot at all, and
//! reports the employee's availability coverage for the slot window so the
//! tier assigner can place them in a tier. Classification has no side
//! effects.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::roster::LiveRoster;
use crate::models::{AvailabilityDeclaration, AvailabilityState, Employee, ShiftSlot, ShiftType};

/// The effective requirements of a slot: its own plus its shift type's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequirements {
    /// The slot being staffed.
    pub slot_id: String,
    /// Start of the slot window.
    pub start_time: NaiveDateTime,
    /// End of the slot window.
    pub end_time: NaiveDateTime,
    /// Every competency the occupant must hold.
    pub competencies: BTreeSet<String>,
    /// Whether the occupant must be an officer.
    pub officer_required: bool,
}

impl SlotRequirements {
    /// Merges a slot's requirements with those of its shift type.
    pub fn for_slot(slot: &ShiftSlot, shift_type: &ShiftType) -> Self {
        Self {
            slot_id: slot.id.clone(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            competencies: slot
                .required_competencies
                .union(&shift_type.required_competencies)
                .cloned()
                .collect(),
            officer_required: slot.officer_required || shift_type.officer_required,
        }
    }
}

/// How an employee's declarations relate to a slot window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityCoverage {
    /// Available declarations cover the whole window.
    Covered,
    /// No declaration overlaps the window (standby).
    Undeclared,
    /// Available declarations overlap the window without covering it.
    Partial,
    /// An unavailable declaration overlaps the window.
    Unavailable,
}

/// Why an employee was rejected for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A required competency is missing.
    MissingCompetency(String),
    /// The slot needs an officer.
    OfficerRequired,
    /// The employee declared themself unavailable.
    Unavailable,
    /// The employee already holds an overlapping slot.
    AlreadyAssigned(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingCompetency(c) => write!(f, "missing competency '{}'", c),
            Rejection::OfficerRequired => write!(f, "officer required"),
            Rejection::Unavailable => write!(f, "declared unavailable"),
            Rejection::AlreadyAssigned(slot_id) => {
                write!(f, "already assigned to overlapping slot '{}'", slot_id)
            }
        }
    }
}

/// Classifies employees against slots for one run.
#[derive(Debug, Clone)]
pub struct EligibilityClassifier<'a> {
    declarations: HashMap<&'a str, Vec<&'a AvailabilityDeclaration>>,
}

impl<'a> EligibilityClassifier<'a> {
    /// Indexes the declarations known at `as_of`.
    ///
    /// Declarations submitted after the run started are ignored so a run
    /// sees one consistent snapshot.
    pub fn new(declarations: &'a [AvailabilityDeclaration], as_of: DateTime<Utc>) -> Self {
        let mut index: HashMap<&'a str, Vec<&'a AvailabilityDeclaration>> = HashMap::new();
        for declaration in declarations.iter().filter(|d| d.visible_at(as_of)) {
            index
                .entry(declaration.employee_id.as_str())
                .or_default()
                .push(declaration);
        }
        Self {
            declarations: index,
        }
    }

    /// Returns the employee's availability coverage for `[start, end)`.
    pub fn coverage(
        &self,
        employee_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AvailabilityCoverage {
        let Some(declarations) = self.declarations.get(employee_id) else {
            return AvailabilityCoverage::Undeclared;
        };

        let overlapping: Vec<&AvailabilityDeclaration> = declarations
            .iter()
            .copied()
            .filter(|d| d.overlaps(start, end))
            .collect();

        if overlapping.is_empty() {
            return AvailabilityCoverage::Undeclared;
        }
        if overlapping
            .iter()
            .any(|d| d.state == AvailabilityState::Unavailable)
        {
            return AvailabilityCoverage::Unavailable;
        }

        // Sweep the available windows to see whether their union covers the slot
        let mut available: Vec<(NaiveDateTime, NaiveDateTime)> = overlapping
            .iter()
            .map(|d| (d.start_time, d.end_time))
            .collect();
        available.sort();

        let mut covered_until = start;
        for (window_start, window_end) in available {
            if window_start > covered_until {
                break;
            }
            covered_until = covered_until.max(window_end);
            if covered_until >= end {
                return AvailabilityCoverage::Covered;
            }
        }
        AvailabilityCoverage::Partial
    }

    /// Checks an employee against a slot.
    ///
    /// Returns the availability coverage on success so callers can tier the
    /// employee without a second lookup.
    pub fn check(
        &self,
        requirements: &SlotRequirements,
        employee: &Employee,
        roster: &LiveRoster,
    ) -> Result<AvailabilityCoverage, Rejection> {
        if let Some(missing) = requirements
            .competencies
            .iter()
            .find(|c| !employee.has_competency(c))
        {
            return Err(Rejection::MissingCompetency(missing.clone()));
        }

        if requirements.officer_required && !employee.is_officer {
            return Err(Rejection::OfficerRequired);
        }

        let coverage = self.coverage(&employee.id, requirements.start_time, requirements.end_time);
        if coverage == AvailabilityCoverage::Unavailable {
            return Err(Rejection::Unavailable);
        }

        if let Some(held) = roster.conflicting_slot(
            &employee.id,
            requirements.start_time,
            requirements.end_time,
            &requirements.slot_id,
        ) {
            return Err(Rejection::AlreadyAssigned(held.to_string()));
        }

        Ok(coverage)
    }

    /// Returns true if the employee may be considered for the slot.
    pub fn eligible(
        &self,
        requirements: &SlotRequirements,
        employee: &Employee,
        roster: &LiveRoster,
    ) -> bool {
        self.check(requirements, employee, roster).is_ok()
    }
}
