//! In-memory store backing every collaborator port.
//!
//! Used by the server binary (optionally seeded from a JSON snapshot) and by
//! the tests. All tenants share one store; slots, declarations and equity
//! are partitioned by tenant while the decision trail is global, keyed by
//! slot id.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ports::{
    AvailabilityStore, DecisionRepository, EquityRepository, PersonnelDirectory,
    RosterRepository, ShiftTypeCatalog,
};
use crate::attribution::RosterSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssignmentDecision, AssignmentSource, AvailabilityDeclaration, Employee, EquityRecord,
    ShiftSlot, ShiftType, SlotAssignment,
};

/// Seed data for one tenant.
///
/// # Example
///
/// ```
/// use shift_attribution::store::TenantSnapshot;
///
/// let json = r#"{
///     "tenant": "sdis-42",
///     "employees": [],
///     "shift_types": [{ "id": "day", "name": "Day watch", "priority": 1 }],
///     "slots": []
/// }"#;
/// let snapshot: TenantSnapshot = serde_json::from_str(json).unwrap();
/// assert_eq!(snapshot.tenant, "sdis-42");
/// assert_eq!(snapshot.roster.shift_types.len(), 1);
/// assert!(snapshot.equity.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantSnapshot {
    /// The tenant the data belongs to.
    pub tenant: String,
    /// Employees, shift types, slots and declarations.
    #[serde(flatten)]
    pub roster: RosterSnapshot,
    /// Equity persisted by earlier runs.
    #[serde(default)]
    pub equity: Vec<EquityRecord>,
}

#[derive(Debug, Default)]
struct TenantData {
    employees: Vec<Employee>,
    shift_types: Vec<ShiftType>,
    slots: Vec<ShiftSlot>,
    declarations: Vec<AvailabilityDeclaration>,
    equity: BTreeMap<(String, String), EquityRecord>,
}

/// Thread-safe in-memory implementation of all ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tenants: RwLock<HashMap<String, TenantData>>,
    decisions: RwLock<Vec<AssignmentDecision>>,
}

fn poisoned(what: &str) -> EngineError {
    EngineError::StoreError {
        message: format!("{} lock poisoned", what),
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given tenants.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = TenantSnapshot>) -> EngineResult<Self> {
        let store = Self::new();
        for snapshot in snapshots {
            store.seed(snapshot)?;
        }
        Ok(store)
    }

    /// Loads a JSON array of [`TenantSnapshot`] documents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed.
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| EngineError::StoreError {
            message: format!("failed to read snapshot '{}': {}", path.display(), e),
        })?;
        let snapshots: Vec<TenantSnapshot> =
            serde_json::from_str(&content).map_err(|e| EngineError::StoreError {
                message: format!("failed to parse snapshot '{}': {}", path.display(), e),
            })?;

        info!(path = %path.display(), tenants = snapshots.len(), "Loaded roster snapshot");
        Self::from_snapshots(snapshots)
    }

    /// Replaces the tenant's data with the snapshot.
    pub fn seed(&self, snapshot: TenantSnapshot) -> EngineResult<()> {
        let TenantSnapshot {
            tenant,
            roster,
            equity,
        } = snapshot;
        let data = TenantData {
            employees: roster.employees,
            shift_types: roster.shift_types,
            slots: roster.slots,
            declarations: roster.declarations,
            equity: equity
                .into_iter()
                .map(|r| ((r.employee_id.clone(), r.period_key.clone()), r))
                .collect(),
        };
        self.write_tenants()?.insert(tenant, data);
        Ok(())
    }

    /// Places a manual assignment, the way an operator edit would.
    ///
    /// # Errors
    ///
    /// Returns `DataInconsistency` if the slot does not exist.
    pub fn assign_manually(&self, tenant: &str, slot_id: &str, employee_id: &str) -> EngineResult<()> {
        let mut tenants = self.write_tenants()?;
        let slot = tenants
            .get_mut(tenant)
            .and_then(|data| data.slots.iter_mut().find(|s| s.id == slot_id))
            .ok_or_else(|| unknown_slot(slot_id))?;
        slot.occupant = Some(employee_id.to_string());
        slot.source = AssignmentSource::Manual;
        Ok(())
    }

    /// Returns every slot of the tenant, regardless of dates.
    pub fn all_slots(&self, tenant: &str) -> EngineResult<Vec<ShiftSlot>> {
        Ok(self
            .read_tenants()?
            .get(tenant)
            .map(|data| data.slots.clone())
            .unwrap_or_default())
    }

    /// Returns every decision recorded so far, oldest first.
    pub fn all_decisions(&self) -> EngineResult<Vec<AssignmentDecision>> {
        Ok(self.read_decisions()?.clone())
    }

    fn read_tenants(&self) -> EngineResult<RwLockReadGuard<'_, HashMap<String, TenantData>>> {
        self.tenants.read().map_err(|_| poisoned("tenant"))
    }

    fn write_tenants(&self) -> EngineResult<RwLockWriteGuard<'_, HashMap<String, TenantData>>> {
        self.tenants.write().map_err(|_| poisoned("tenant"))
    }

    fn read_decisions(&self) -> EngineResult<RwLockReadGuard<'_, Vec<AssignmentDecision>>> {
        self.decisions.read().map_err(|_| poisoned("decision"))
    }

    fn with_tenant<T>(&self, tenant: &str, read: impl FnOnce(&TenantData) -> T) -> EngineResult<T>
    where
        T: Default,
    {
        Ok(self.read_tenants()?.get(tenant).map(read).unwrap_or_default())
    }
}

fn unknown_slot(slot_id: &str) -> EngineError {
    EngineError::DataInconsistency {
        slot_id: slot_id.to_string(),
        message: "slot does not exist in the roster".to_string(),
    }
}

impl PersonnelDirectory for InMemoryStore {
    fn list_employees(&self, tenant: &str) -> EngineResult<Vec<Employee>> {
        self.with_tenant(tenant, |data| data.employees.clone())
    }
}

impl AvailabilityStore for InMemoryStore {
    fn list_declarations(
        &self,
        tenant: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<Vec<AvailabilityDeclaration>> {
        self.with_tenant(tenant, |data| {
            data.declarations
                .iter()
                .filter(|d| d.overlaps(start, end))
                .cloned()
                .collect()
        })
    }
}

impl ShiftTypeCatalog for InMemoryStore {
    fn list_shift_types(&self, tenant: &str) -> EngineResult<Vec<ShiftType>> {
        self.with_tenant(tenant, |data| data.shift_types.clone())
    }
}

impl RosterRepository for InMemoryStore {
    fn list_slots(
        &self,
        tenant: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<Vec<ShiftSlot>> {
        self.with_tenant(tenant, |data| {
            data.slots
                .iter()
                .filter(|s| s.overlaps(start, end))
                .cloned()
                .collect()
        })
    }

    fn apply_auto_assignments(
        &self,
        tenant: &str,
        assignments: &[SlotAssignment],
    ) -> EngineResult<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let mut tenants = self.write_tenants()?;
        let data = tenants.get_mut(tenant).ok_or_else(|| EngineError::StoreError {
            message: format!("unknown tenant '{}'", tenant),
        })?;

        // Validate the whole batch before touching any slot
        let mut positions = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let position = data
                .slots
                .iter()
                .position(|s| s.id == assignment.slot_id)
                .ok_or_else(|| unknown_slot(&assignment.slot_id))?;
            if data.slots[position].is_manual() {
                return Err(EngineError::ManualSlotProtected {
                    slot_id: assignment.slot_id.clone(),
                });
            }
            positions.push(position);
        }

        for (position, assignment) in positions.into_iter().zip(assignments) {
            let slot = &mut data.slots[position];
            slot.occupant = Some(assignment.employee_id.clone());
            slot.source = assignment.source;
        }

        debug!(tenant = %tenant, count = assignments.len(), "Applied automatic assignments");
        Ok(())
    }
}

impl EquityRepository for InMemoryStore {
    fn load_equity(&self, tenant: &str) -> EngineResult<Vec<EquityRecord>> {
        self.with_tenant(tenant, |data| data.equity.values().cloned().collect())
    }

    fn save_equity(&self, tenant: &str, records: &[EquityRecord]) -> EngineResult<()> {
        let mut tenants = self.write_tenants()?;
        let data = tenants.entry(tenant.to_string()).or_default();
        for record in records {
            data.equity.insert(
                (record.employee_id.clone(), record.period_key.clone()),
                record.clone(),
            );
        }
        Ok(())
    }
}

impl DecisionRepository for InMemoryStore {
    fn append_decisions(&self, decisions: &[AssignmentDecision]) -> EngineResult<()> {
        self.decisions
            .write()
            .map_err(|_| poisoned("decision"))?
            .extend_from_slice(decisions);
        Ok(())
    }

    fn latest_decision(&self, slot_id: &str) -> EngineResult<Option<AssignmentDecision>> {
        Ok(self
            .read_decisions()?
            .iter()
            .rev()
            .find(|d| d.slot_id == slot_id)
            .cloned())
    }
}
