//! Live in-memory roster for one run.
//!
//! Eligibility checks read occupancy from here rather than from the initial
//! snapshot, so an assignment made earlier in the run immediately blocks the
//! same employee from any overlapping slot.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::{EngineError, EngineResult};
use crate::models::{AssignmentSource, ShiftSlot};

/// An occupied window held by an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Occupancy {
    slot_id: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
}

/// The roster as it evolves during a run.
#[derive(Debug, Clone, Default)]
pub struct LiveRoster {
    slots: Vec<ShiftSlot>,
    index: HashMap<String, usize>,
    occupancy: HashMap<String, Vec<Occupancy>>,
}

impl LiveRoster {
    /// Builds the live roster from the loaded slots.
    pub fn new(slots: Vec<ShiftSlot>) -> Self {
        let mut roster = Self::default();
        for slot in slots {
            roster.index.insert(slot.id.clone(), roster.slots.len());
            if let Some(occupant) = &slot.occupant {
                roster.hold(occupant, &slot);
            }
            roster.slots.push(slot);
        }
        roster
    }

    fn hold(&mut self, employee_id: &str, slot: &ShiftSlot) {
        self.occupancy
            .entry(employee_id.to_string())
            .or_default()
            .push(Occupancy {
                slot_id: slot.id.clone(),
                start_time: slot.start_time,
                end_time: slot.end_time,
            });
    }

    /// Returns the slot with the given id.
    pub fn slot(&self, slot_id: &str) -> Option<&ShiftSlot> {
        self.index.get(slot_id).map(|&i| &self.slots[i])
    }

    /// Returns the id of a slot the employee holds that overlaps `[start, end)`.
    ///
    /// `exclude_slot` is ignored so a slot never conflicts with itself.
    pub fn conflicting_slot(
        &self,
        employee_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_slot: &str,
    ) -> Option<&str> {
        self.occupancy.get(employee_id).and_then(|held| {
            held.iter()
                .find(|o| o.slot_id != exclude_slot && o.start_time < end && start < o.end_time)
                .map(|o| o.slot_id.as_str())
        })
    }

    /// Places an employee on a slot as an automatic assignment.
    ///
    /// # Errors
    ///
    /// Returns `ManualSlotProtected` for manual slots and `DataInconsistency`
    /// if the slot is unknown or already occupied.
    pub fn assign_auto(&mut self, slot_id: &str, employee_id: &str) -> EngineResult<()> {
        let position = *self
            .index
            .get(slot_id)
            .ok_or_else(|| EngineError::DataInconsistency {
                slot_id: slot_id.to_string(),
                message: "slot is not part of the loaded roster".to_string(),
            })?;

        let slot = &mut self.slots[position];
        if slot.is_manual() {
            return Err(EngineError::ManualSlotProtected {
                slot_id: slot_id.to_string(),
            });
        }
        if let Some(occupant) = &slot.occupant {
            return Err(EngineError::DataInconsistency {
                slot_id: slot_id.to_string(),
                message: format!("slot is already held by '{}'", occupant),
            });
        }

        slot.occupant = Some(employee_id.to_string());
        slot.source = AssignmentSource::Auto;
        let slot = slot.clone();
        self.hold(employee_id, &slot);
        Ok(())
    }

    /// Consumes the roster, returning the slots in load order.
    pub fn into_slots(self) -> Vec<ShiftSlot> {
        self.slots
    }
}
