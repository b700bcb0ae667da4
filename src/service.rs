//! The attribution service.
//!
//! Exposes the two operations operators use: triggering a run over a
//! horizon and reading the decision trail of a slot. The service owns the
//! run lock registry and the collaborator ports; the engine itself only
//! ever sees an in-memory snapshot.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::attribution::{EquityLedger, RosterSnapshot, RunLockRegistry, run_attribution};
use crate::config::AttributionConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AssignmentDecision, Horizon, RunSummary};
use crate::store::{
    AvailabilityStore, DecisionRepository, EquityRepository, InMemoryStore, PersonnelDirectory,
    RosterRepository, ShiftTypeCatalog,
};

/// The collaborators a service reads from and writes to.
#[derive(Clone)]
pub struct ServicePorts {
    /// Personnel directory.
    pub personnel: Arc<dyn PersonnelDirectory>,
    /// Availability declarations store.
    pub availability: Arc<dyn AvailabilityStore>,
    /// Shift-type catalog.
    pub catalog: Arc<dyn ShiftTypeCatalog>,
    /// Roster persistence.
    pub roster: Arc<dyn RosterRepository>,
    /// Equity persistence.
    pub equity: Arc<dyn EquityRepository>,
    /// Decision trail.
    pub decisions: Arc<dyn DecisionRepository>,
}

/// Runs attributions against a set of ports.
#[derive(Clone)]
pub struct AttributionService {
    ports: ServicePorts,
    locks: RunLockRegistry,
}

impl AttributionService {
    /// Creates a service over the given ports.
    pub fn new(ports: ServicePorts) -> Self {
        Self {
            ports,
            locks: RunLockRegistry::new(),
        }
    }

    /// Creates a service backed entirely by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::new(ServicePorts {
            personnel: store.clone(),
            availability: store.clone(),
            catalog: store.clone(),
            roster: store.clone(),
            equity: store.clone(),
            decisions: store,
        })
    }

    /// Returns the run lock registry.
    pub fn locks(&self) -> &RunLockRegistry {
        &self.locks
    }

    /// Fills every open slot of the horizon and persists the result.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the configuration cannot run over the
    ///   horizon; nothing is read or written
    /// - `ConcurrentRunRejected` if a run for the tenant over an overlapping
    ///   horizon is in flight
    /// - store errors raised by the ports
    pub fn run_auto_assignment(
        &self,
        tenant: &str,
        horizon_start: NaiveDate,
        horizon_end: NaiveDate,
        config: &AttributionConfig,
    ) -> EngineResult<RunSummary> {
        self.run_auto_assignment_at(tenant, horizon_start, horizon_end, config, Utc::now())
    }

    /// Same as [`Self::run_auto_assignment`] with an explicit run instant.
    ///
    /// Declarations submitted after `as_of` are ignored.
    pub fn run_auto_assignment_at(
        &self,
        tenant: &str,
        horizon_start: NaiveDate,
        horizon_end: NaiveDate,
        config: &AttributionConfig,
        as_of: DateTime<Utc>,
    ) -> EngineResult<RunSummary> {
        let horizon = Horizon::new(horizon_start, horizon_end);
        config.validate(&horizon)?;

        let _guard = self.locks.acquire(tenant, horizon)?;

        let snapshot = self.load_snapshot(tenant, &horizon)?;
        let ledger = EquityLedger::from_records(self.ports.equity.load_equity(tenant)?);
        debug!(
            tenant = %tenant,
            horizon = %horizon,
            employees = snapshot.employees.len(),
            slots = snapshot.slots.len(),
            declarations = snapshot.declarations.len(),
            "Loaded roster snapshot"
        );

        let outcome = run_attribution(tenant, horizon, config, snapshot, ledger, as_of)?;

        self.ports
            .roster
            .apply_auto_assignments(tenant, &outcome.assignments)?;
        self.ports
            .equity
            .save_equity(tenant, &outcome.ledger.records())?;
        self.ports
            .decisions
            .append_decisions(&outcome.summary.decisions)?;

        info!(
            run_id = %outcome.summary.run_id,
            tenant = %tenant,
            assignments = outcome.assignments.len(),
            "Attribution run persisted"
        );
        Ok(outcome.summary)
    }

    /// Returns the most recent decision recorded for a slot.
    ///
    /// # Errors
    ///
    /// Returns `DecisionNotFound` if the slot was never filled automatically.
    pub fn get_decision_trail(&self, slot_id: &str) -> EngineResult<AssignmentDecision> {
        self.ports
            .decisions
            .latest_decision(slot_id)?
            .ok_or_else(|| EngineError::DecisionNotFound {
                slot_id: slot_id.to_string(),
            })
    }

    /// Loads everything a run over `horizon` reads.
    ///
    /// Slots starting in the horizon may run past its last midnight, so the
    /// occupancy and declaration reads are widened up to the latest end of
    /// such a slot.
    fn load_snapshot(&self, tenant: &str, horizon: &Horizon) -> EngineResult<RosterSnapshot> {
        let start = horizon.start_time();
        let mut slots = self.ports.roster.list_slots(tenant, start, horizon.end_time())?;

        let end = slots
            .iter()
            .filter(|s| horizon.contains_date(s.date()))
            .map(|s| s.end_time)
            .fold(horizon.end_time(), |a, b| a.max(b));
        if end > horizon.end_time() {
            slots = self.ports.roster.list_slots(tenant, start, end)?;
            debug!(
                tenant = %tenant,
                window_start = %start,
                window_end = %end,
                "Widened roster window past the horizon"
            );
        }

        Ok(RosterSnapshot {
            employees: self.ports.personnel.list_employees(tenant)?,
            shift_types: self.ports.catalog.list_shift_types(tenant)?,
            slots,
            declarations: self.ports.availability.list_declarations(tenant, start, end)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentSource, Employee, EmploymentType, ShiftSlot, ShiftType};
    use crate::store::TenantSnapshot;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn create_store() -> Arc<InMemoryStore> {
        let snapshot = TenantSnapshot {
            tenant: "sdis-42".to_string(),
            roster: RosterSnapshot {
                employees: vec![Employee {
                    id: "emp_001".to_string(),
                    employment_type: EmploymentType::PartTime,
                    seniority_date: NaiveDate::from_ymd_opt(2018, 5, 1).unwrap(),
                    weekly_hour_cap: Decimal::new(36, 0),
                    competencies: BTreeSet::new(),
                    is_officer: false,
                }],
                shift_types: vec![ShiftType {
                    id: "day".to_string(),
                    name: "Day watch".to_string(),
                    priority: 1,
                    required_competencies: BTreeSet::new(),
                    officer_required: false,
                }],
                slots: vec![ShiftSlot {
                    id: "slot_001".to_string(),
                    shift_type_id: "day".to_string(),
                    required_competencies: BTreeSet::new(),
                    officer_required: false,
                    start_time: make_datetime("2026-03-02 08:00:00"),
                    end_time: make_datetime("2026-03-02 20:00:00"),
                    occupant: None,
                    source: AssignmentSource::Unfilled,
                }],
                declarations: vec![],
            },
            equity: vec![],
        };
        Arc::new(InMemoryStore::from_snapshots(vec![snapshot]).unwrap())
    }

    #[test]
    fn test_run_persists_slot_equity_and_decision() {
        let store = create_store();
        let service = AttributionService::in_memory(store.clone());

        let summary = service
            .run_auto_assignment("sdis-42", date(2), date(8), &AttributionConfig::default())
            .unwrap();
        assert_eq!(summary.filled_count(), 1);

        let slot = &store.all_slots("sdis-42").unwrap()[0];
        assert_eq!(slot.occupant.as_deref(), Some("emp_001"));
        assert_eq!(slot.source, AssignmentSource::Auto);

        let equity = store.load_equity("sdis-42").unwrap();
        assert_eq!(equity.len(), 1);
        assert_eq!(equity[0].cumulative_hours, Decimal::new(12, 0));

        let decision = service.get_decision_trail("slot_001").unwrap();
        assert_eq!(decision.employee_id, "emp_001");
        assert_eq!(decision.run_id, summary.run_id);
    }

    #[test]
    fn test_lock_is_released_after_run() {
        let service = AttributionService::in_memory(create_store());
        service
            .run_auto_assignment("sdis-42", date(2), date(8), &AttributionConfig::default())
            .unwrap();
        assert!(!service.locks().is_running("sdis-42"));
    }

    #[test]
    fn test_lock_is_released_after_failed_validation() {
        let service = AttributionService::in_memory(create_store());
        let result =
            service.run_auto_assignment("sdis-42", date(8), date(2), &AttributionConfig::default());
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));
        assert!(!service.locks().is_running("sdis-42"));
    }

    #[test]
    fn test_decision_trail_for_unknown_slot() {
        let service = AttributionService::in_memory(create_store());
        assert!(matches!(
            service.get_decision_trail("slot_404"),
            Err(EngineError::DecisionNotFound { .. })
        ));
    }
}
