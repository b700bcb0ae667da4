//! Tier assignment.
//!
//! Eligible candidates for a slot are partitioned into the configurable
//! tiers and the tiers are consulted in fixed order; the first tier that
//! yields a candidate wins. Each tier is a [`TierStrategy`] so the assigner
//! simply folds over the enabled ones.
//!
//! Within a tier, candidates are ordered by ascending equity hours (the
//! person most owed a shift first), except Tier 4 which orders by hours
//! still needed to reach the weekly cap, descending. Ties go to the earlier
//! seniority date, then to the employee id so runs are deterministic.

use std::cmp::Ordering;
use std::fmt::Debug;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::eligibility::{AvailabilityCoverage, EligibilityClassifier, SlotRequirements};
use super::equity::{EquityLedger, PeriodKeys};
use super::overtime::OvertimeGate;
use super::roster::LiveRoster;
use crate::config::AttributionConfig;
use crate::models::{CandidateSnapshot, Employee, Tier};

/// An eligible employee with the values tiers are ranked on.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// The employee.
    pub employee: &'a Employee,
    /// Availability coverage of the slot window.
    pub coverage: AvailabilityCoverage,
    /// Hours in the active equity period.
    pub equity_hours: Decimal,
    /// Hours in the slot's calendar week.
    pub week_hours: Decimal,
}

impl<'a> Candidate<'a> {
    /// Reads the candidate's current ledger values.
    pub fn new(
        employee: &'a Employee,
        coverage: AvailabilityCoverage,
        ledger: &EquityLedger,
        keys: &PeriodKeys,
    ) -> Self {
        Self {
            employee,
            coverage,
            equity_hours: ledger.equity_hours(&employee.id, keys),
            week_hours: ledger.get(&employee.id, &keys.week),
        }
    }

    /// Hours remaining until the weekly cap.
    pub fn hours_remaining(&self) -> Decimal {
        self.employee.weekly_hour_cap - self.week_hours
    }

    /// Returns true while the weekly cap is not reached.
    pub fn is_under_cap(&self) -> bool {
        self.week_hours < self.employee.weekly_hour_cap
    }

    fn snapshot(
        &self,
        tier: Tier,
        rank: u32,
        selected: bool,
        rejection: Option<String>,
    ) -> CandidateSnapshot {
        CandidateSnapshot {
            rank,
            employee_id: self.employee.id.clone(),
            tier,
            equity_hours: self.equity_hours,
            week_hours: self.week_hours,
            weekly_hour_cap: self.employee.weekly_hour_cap,
            hours_remaining: self.hours_remaining(),
            seniority_date: self.employee.seniority_date,
            selected,
            rejection,
        }
    }
}

/// What selection needs to re-validate a candidate against the live roster.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'r, 'd> {
    /// The slot being filled.
    pub requirements: &'r SlotRequirements,
    /// The run's classifier.
    pub classifier: &'r EligibilityClassifier<'d>,
    /// The live roster.
    pub roster: &'r LiveRoster,
}

/// The outcome of a tier yielding a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSelection {
    /// The chosen employee.
    pub employee_id: String,
    /// The winning tier.
    pub tier: Tier,
    /// Every member of the winning tier, in rank order.
    pub candidates: Vec<CandidateSnapshot>,
}

fn by_equity_then_seniority(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.equity_hours
        .cmp(&b.equity_hours)
        .then_with(|| by_seniority(a, b))
}

fn by_seniority(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.employee
        .seniority_date
        .cmp(&b.employee.seniority_date)
        .then_with(|| a.employee.id.cmp(&b.employee.id))
}

/// A configurable tier.
pub trait TierStrategy: Debug + Send + Sync {
    /// The tier this strategy implements.
    fn tier(&self) -> Tier;

    /// Returns true if the candidate belongs to this tier.
    fn admits(&self, candidate: &Candidate<'_>) -> bool;

    /// Orders two members of the tier; the smaller one is preferred.
    fn compare(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        by_equity_then_seniority(a, b)
    }

    /// Selects the best member that still passes eligibility.
    ///
    /// Returns `None` when the tier is empty or every member fails
    /// re-validation, so the assigner falls through to the next tier.
    fn try_assign(
        &self,
        ctx: &SelectionContext<'_, '_>,
        pool: &[Candidate<'_>],
    ) -> Option<TierSelection> {
        let mut members: Vec<&Candidate<'_>> =
            pool.iter().filter(|c| self.admits(c)).collect();
        if members.is_empty() {
            return None;
        }
        members.sort_by(|a, b| self.compare(a, b));

        let mut chosen: Option<String> = None;
        let mut snapshots = Vec::with_capacity(members.len());
        for (position, candidate) in members.iter().enumerate() {
            let mut selected = false;
            let mut rejection = None;
            if chosen.is_none() {
                match ctx
                    .classifier
                    .check(ctx.requirements, candidate.employee, ctx.roster)
                {
                    Ok(_) => {
                        selected = true;
                        chosen = Some(candidate.employee.id.clone());
                    }
                    Err(reason) => {
                        trace!(
                            slot_id = %ctx.requirements.slot_id,
                            employee_id = %candidate.employee.id,
                            reason = %reason,
                            "Candidate failed re-validation"
                        );
                        rejection = Some(reason.to_string());
                    }
                }
            }
            snapshots.push(candidate.snapshot(self.tier(), position as u32 + 1, selected, rejection));
        }

        match chosen {
            Some(employee_id) => Some(TierSelection {
                employee_id,
                tier: self.tier(),
                candidates: snapshots,
            }),
            None => {
                debug!(
                    slot_id = %ctx.requirements.slot_id,
                    tier = self.tier().number(),
                    members = snapshots.len(),
                    "Every tier member failed re-validation, falling through"
                );
                None
            }
        }
    }
}

/// Tier 2: part-time employees declared available for the whole slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartTimeAvailable;

impl TierStrategy for PartTimeAvailable {
    fn tier(&self) -> Tier {
        Tier::PartTimeAvailable
    }

    fn admits(&self, candidate: &Candidate<'_>) -> bool {
        candidate.employee.is_part_time() && candidate.coverage == AvailabilityCoverage::Covered
    }
}

/// Tier 3: part-time employees with no declaration for the slot window.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartTimeStandby;

impl TierStrategy for PartTimeStandby {
    fn tier(&self) -> Tier {
        Tier::PartTimeStandby
    }

    fn admits(&self, candidate: &Candidate<'_>) -> bool {
        candidate.employee.is_part_time() && candidate.coverage == AvailabilityCoverage::Undeclared
    }
}

/// Tier 4: full-time employees still below their weekly cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTimeIncomplete;

impl TierStrategy for FullTimeIncomplete {
    fn tier(&self) -> Tier {
        Tier::FullTimeIncomplete
    }

    fn admits(&self, candidate: &Candidate<'_>) -> bool {
        candidate.employee.is_full_time() && candidate.is_under_cap()
    }

    // Most hours still needed first
    fn compare(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
        b.hours_remaining()
            .cmp(&a.hours_remaining())
            .then_with(|| by_seniority(a, b))
    }
}

/// Tier 5: full-time employees at or above their weekly cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTimeOvertime;

impl TierStrategy for FullTimeOvertime {
    fn tier(&self) -> Tier {
        Tier::FullTimeOvertime
    }

    fn admits(&self, candidate: &Candidate<'_>) -> bool {
        candidate.employee.is_full_time() && !candidate.is_under_cap()
    }
}

/// The ordered list of tiers enabled for a run.
#[derive(Debug)]
pub struct TierAssigner {
    strategies: Vec<Box<dyn TierStrategy>>,
}

impl TierAssigner {
    /// Builds the tier list from the run configuration.
    ///
    /// Disabled tiers are left out. Tier 5 is only included when the
    /// overtime gate is open.
    pub fn from_config(config: &AttributionConfig) -> Self {
        let gate = OvertimeGate::from_config(config);
        let mut strategies: Vec<Box<dyn TierStrategy>> = Vec::new();

        if config.tier2_enabled {
            strategies.push(Box::new(PartTimeAvailable));
        }
        if config.tier3_enabled {
            strategies.push(Box::new(PartTimeStandby));
        }
        if config.tier4_enabled {
            strategies.push(Box::new(FullTimeIncomplete));
        }
        if gate.admits_overtime_tier(config) {
            strategies.push(Box::new(FullTimeOvertime));
        }

        Self { strategies }
    }

    /// Returns the enabled tiers in evaluation order.
    pub fn tiers(&self) -> Vec<Tier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Picks a candidate for the slot from the first tier that yields one.
    pub fn assign(
        &self,
        ctx: &SelectionContext<'_, '_>,
        pool: &[Candidate<'_>],
    ) -> Option<TierSelection> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.try_assign(ctx, pool))
    }
}
