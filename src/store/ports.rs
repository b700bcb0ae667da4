//! Collaborator ports.
//!
//! The engine never talks to the personnel directory, the availability
//! store, the shift-type catalog or the roster directly; it reads and writes
//! them through these traits. Every port is synchronous because a run is a
//! single in-memory pass over a snapshot loaded up front.

use chrono::NaiveDateTime;

use crate::error::EngineResult;
use crate::models::{
    AssignmentDecision, AvailabilityDeclaration, Employee, EquityRecord, ShiftSlot, ShiftType,
    SlotAssignment,
};

/// Read-only access to the personnel directory.
pub trait PersonnelDirectory: Send + Sync {
    /// Lists the tenant's employees.
    fn list_employees(&self, tenant: &str) -> EngineResult<Vec<Employee>>;
}

/// Read-only access to availability declarations.
pub trait AvailabilityStore: Send + Sync {
    /// Lists declarations overlapping `[start, end)`.
    fn list_declarations(
        &self,
        tenant: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<Vec<AvailabilityDeclaration>>;
}

/// Read-only access to the shift-type catalog.
pub trait ShiftTypeCatalog: Send + Sync {
    /// Lists the tenant's shift types.
    fn list_shift_types(&self, tenant: &str) -> EngineResult<Vec<ShiftType>>;
}

/// Roster persistence.
pub trait RosterRepository: Send + Sync {
    /// Lists slots overlapping `[start, end)`.
    fn list_slots(
        &self,
        tenant: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<Vec<ShiftSlot>>;

    /// Writes automatic assignments through the regular slot-update path.
    ///
    /// Implementations must reject the whole batch, writing nothing, if any
    /// target slot carries a manual assignment.
    fn apply_auto_assignments(&self, tenant: &str, assignments: &[SlotAssignment])
    -> EngineResult<()>;
}

/// Equity ledger persistence.
pub trait EquityRepository: Send + Sync {
    /// Loads every equity record of the tenant.
    fn load_equity(&self, tenant: &str) -> EngineResult<Vec<EquityRecord>>;

    /// Upserts records keyed by employee and period.
    fn save_equity(&self, tenant: &str, records: &[EquityRecord]) -> EngineResult<()>;
}

/// Append-only audit trail of assignment decisions.
pub trait DecisionRepository: Send + Sync {
    /// Appends decisions.
    fn append_decisions(&self, decisions: &[AssignmentDecision]) -> EngineResult<()>;

    /// Returns the most recent decision for a slot, if any.
    fn latest_decision(&self, slot_id: &str) -> EngineResult<Option<AssignmentDecision>>;
}
