//! Assignment recording.
//!
//! Writes the chosen employee onto the slot, credits the equity ledger, and
//! appends the immutable decision entry that explains the choice.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::equity::{EquityLedger, PeriodKeys};
use super::roster::LiveRoster;
use super::tiers::TierSelection;
use crate::error::{EngineError, EngineResult};
use crate::models::AssignmentDecision;

/// Records automatic assignments for one run.
#[derive(Debug, Clone)]
pub struct AssignmentRecorder {
    run_id: Uuid,
    decisions: Vec<AssignmentDecision>,
}

impl AssignmentRecorder {
    /// Creates a recorder for the given run.
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            decisions: Vec::new(),
        }
    }

    /// Records a selection on a slot.
    ///
    /// The slot is marked `auto` with the chosen occupant, the employee is
    /// credited the slot's hours under both period keys, and a decision is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns `ManualSlotProtected` if the slot was placed manually and
    /// `DataInconsistency` if it is unknown or already occupied. Nothing is
    /// written in either case.
    pub fn record(
        &mut self,
        slot_id: &str,
        selection: TierSelection,
        keys: &PeriodKeys,
        roster: &mut LiveRoster,
        ledger: &mut EquityLedger,
    ) -> EngineResult<AssignmentDecision> {
        let slot_hours = roster
            .slot(slot_id)
            .map(|slot| slot.duration_hours())
            .ok_or_else(|| EngineError::DataInconsistency {
                slot_id: slot_id.to_string(),
                message: "slot is not part of the loaded roster".to_string(),
            })?;

        roster.assign_auto(slot_id, &selection.employee_id)?;
        ledger.credit_assignment(&selection.employee_id, keys, slot_hours);

        let decision = AssignmentDecision {
            decision_id: Uuid::new_v4(),
            run_id: self.run_id,
            slot_id: slot_id.to_string(),
            employee_id: selection.employee_id,
            tier: selection.tier,
            period_key: keys.equity.clone(),
            slot_hours,
            candidates: selection.candidates,
            decided_at: Utc::now(),
        };

        info!(
            run_id = %self.run_id,
            slot_id = %decision.slot_id,
            employee_id = %decision.employee_id,
            tier = decision.tier.number(),
            candidates = decision.candidates.len(),
            equity_hours = %ledger.equity_hours(&decision.employee_id, keys),
            "Slot assigned"
        );

        self.decisions.push(decision.clone());
        Ok(decision)
    }

    /// Consumes the recorder, returning its decisions.
    pub fn into_decisions(self) -> Vec<AssignmentDecision> {
        self.decisions
    }
}
