//! Run orchestration.
//!
//! Drives one attribution pass over a horizon: orders the open slots by
//! shift-type priority then chronologically, and for each slot runs the
//! classifier, the tier assigner and the recorder in sequence. Slots are
//! processed strictly one after another because every assignment changes
//! the equity values and occupancy the next slot is ranked on.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use super::eligibility::{EligibilityClassifier, SlotRequirements};
use super::equity::{EquityLedger, PeriodKeys};
use super::recorder::AssignmentRecorder;
use super::roster::LiveRoster;
use super::tiers::{Candidate, SelectionContext, TierAssigner};
use crate::config::AttributionConfig;
use crate::error::EngineResult;
use crate::models::{
    AssignmentSource, AvailabilityDeclaration, Employee, FilledSlot, Horizon, RunSummary,
    ShiftSlot, ShiftType, SkippedSlot, SlotAssignment, UnfillableReason, UnfilledSlot,
};

/// Everything a run reads, loaded once up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Personnel directory snapshot.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Shift-type catalog snapshot.
    #[serde(default)]
    pub shift_types: Vec<ShiftType>,
    /// Slots overlapping the horizon or any slot starting in it.
    #[serde(default)]
    pub slots: Vec<ShiftSlot>,
    /// Declarations overlapping the same window as the slots.
    #[serde(default)]
    pub declarations: Vec<AvailabilityDeclaration>,
}

/// The result of a run before it is written back.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Summary handed back to the operator.
    pub summary: RunSummary,
    /// Slot mutations to persist, in processing order.
    pub assignments: Vec<SlotAssignment>,
    /// Ledger including every credit made by the run.
    pub ledger: EquityLedger,
    /// The roster as it stands after the run.
    pub slots: Vec<ShiftSlot>,
}

/// A slot queued for processing.
struct QueuedSlot<'a> {
    slot: &'a ShiftSlot,
    shift_type: &'a ShiftType,
}

/// Runs one attribution pass in memory.
///
/// # Arguments
///
/// * `tenant` - The fire department the run is for
/// * `horizon` - The dates whose slots are processed
/// * `config` - Run configuration
/// * `snapshot` - Employees, shift types, slots and declarations
/// * `ledger` - Equity values persisted by earlier runs
/// * `as_of` - Run start; declarations submitted later are ignored
///
/// # Errors
///
/// Returns `InvalidConfiguration` before anything is evaluated if the
/// configuration is invalid for the horizon. Unfillable or inconsistent
/// slots never fail the run; they are reported in the summary.
pub fn run_attribution(
    tenant: &str,
    horizon: Horizon,
    config: &AttributionConfig,
    snapshot: RosterSnapshot,
    mut ledger: EquityLedger,
    as_of: DateTime<Utc>,
) -> EngineResult<RunOutcome> {
    config.validate(&horizon)?;

    let started = Instant::now();
    let run_id = Uuid::new_v4();
    let assigner = TierAssigner::from_config(config);

    info!(
        run_id = %run_id,
        tenant = %tenant,
        horizon = %horizon,
        employees = snapshot.employees.len(),
        slots = snapshot.slots.len(),
        tiers = ?assigner.tiers().iter().map(|t| t.number()).collect::<Vec<_>>(),
        overtime_enabled = config.overtime_enabled,
        "Starting attribution run"
    );

    let RosterSnapshot {
        employees,
        shift_types,
        slots,
        declarations,
    } = snapshot;

    let shift_types: HashMap<&str, &ShiftType> =
        shift_types.iter().map(|t| (t.id.as_str(), t)).collect();
    let known_employees: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
    let mut skipped = Vec::new();

    // Tier 0 and Tier 1: priority order, manual and occupied slots left out
    let mut queue: Vec<QueuedSlot<'_>> = Vec::new();
    for slot in slots.iter().filter(|s| horizon.contains_date(s.date())) {
        if let Some(occupant) = slot.occupant.as_deref() {
            if !known_employees.contains(occupant) {
                warn!(
                    run_id = %run_id,
                    slot_id = %slot.id,
                    employee_id = %occupant,
                    "Slot is held by an unknown employee, skipping"
                );
                skipped.push(SkippedSlot {
                    slot_id: slot.id.clone(),
                    reason: format!("unknown occupant '{}'", occupant),
                });
            }
        }
        if !slot.needs_filling() {
            continue;
        }
        if slot.end_time <= slot.start_time {
            warn!(run_id = %run_id, slot_id = %slot.id, "Slot ends before it starts, skipping");
            skipped.push(SkippedSlot {
                slot_id: slot.id.clone(),
                reason: "slot end is not after its start".to_string(),
            });
            continue;
        }
        match shift_types.get(slot.shift_type_id.as_str()) {
            Some(shift_type) => queue.push(QueuedSlot { slot, shift_type }),
            None => {
                warn!(
                    run_id = %run_id,
                    slot_id = %slot.id,
                    shift_type_id = %slot.shift_type_id,
                    "Slot references an unknown shift type, skipping"
                );
                skipped.push(SkippedSlot {
                    slot_id: slot.id.clone(),
                    reason: format!("unknown shift type '{}'", slot.shift_type_id),
                });
            }
        }
    }
    queue.sort_by(|a, b| {
        a.shift_type
            .priority
            .cmp(&b.shift_type.priority)
            .then_with(|| a.slot.start_time.cmp(&b.slot.start_time))
            .then_with(|| a.slot.id.cmp(&b.slot.id))
    });

    let classifier = EligibilityClassifier::new(&declarations, as_of);
    let mut roster = LiveRoster::new(slots.clone());
    let mut recorder = AssignmentRecorder::new(run_id);
    let mut filled = Vec::new();
    let mut unfilled = Vec::new();

    for queued in &queue {
        let slot = queued.slot;
        let requirements = SlotRequirements::for_slot(slot, queued.shift_type);
        let keys = PeriodKeys::for_date(slot.date(), config.equity_window);

        let selection = {
            let pool: Vec<Candidate<'_>> = employees
                .iter()
                .filter_map(|employee| {
                    match classifier.check(&requirements, employee, &roster) {
                        Ok(coverage) => Some(Candidate::new(employee, coverage, &ledger, &keys)),
                        Err(reason) => {
                            trace!(
                                slot_id = %slot.id,
                                employee_id = %employee.id,
                                reason = %reason,
                                "Employee not eligible"
                            );
                            None
                        }
                    }
                })
                .collect();

            if pool.is_empty() {
                Err((UnfillableReason::NoEligibleCandidate, 0))
            } else {
                let ctx = SelectionContext {
                    requirements: &requirements,
                    classifier: &classifier,
                    roster: &roster,
                };
                assigner
                    .assign(&ctx, &pool)
                    .ok_or((UnfillableReason::AllTiersExhausted, pool.len()))
            }
        };

        match selection {
            Ok(selection) => {
                match recorder.record(&slot.id, selection, &keys, &mut roster, &mut ledger) {
                    Ok(decision) => filled.push(FilledSlot {
                        slot_id: decision.slot_id,
                        employee_id: decision.employee_id,
                        tier: decision.tier,
                    }),
                    Err(err) => {
                        warn!(run_id = %run_id, slot_id = %slot.id, error = %err, "Assignment not recorded");
                        skipped.push(SkippedSlot {
                            slot_id: slot.id.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
            Err((reason, eligible_candidates)) => {
                debug!(
                    run_id = %run_id,
                    slot_id = %slot.id,
                    reason = ?reason,
                    eligible_candidates,
                    "Slot left unfilled"
                );
                unfilled.push(UnfilledSlot {
                    slot_id: slot.id.clone(),
                    reason,
                    eligible_candidates,
                });
            }
        }
    }

    let decisions = recorder.into_decisions();
    let assignments = decisions
        .iter()
        .map(|d| SlotAssignment {
            slot_id: d.slot_id.clone(),
            employee_id: d.employee_id.clone(),
            source: AssignmentSource::Auto,
        })
        .collect();
    let duration_us = started.elapsed().as_micros() as u64;

    info!(
        run_id = %run_id,
        tenant = %tenant,
        filled = filled.len(),
        unfilled = unfilled.len(),
        skipped = skipped.len(),
        duration_us,
        "Attribution run completed"
    );

    Ok(RunOutcome {
        summary: RunSummary {
            run_id,
            tenant: tenant.to_string(),
            horizon,
            equity_window: config.equity_window,
            started_at: as_of,
            filled,
            unfilled,
            skipped,
            decisions,
            duration_us,
        },
        assignments,
        ledger,
        slots: roster.into_slots(),
    })
}
