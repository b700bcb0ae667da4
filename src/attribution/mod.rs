//! The attribution engine.
//!
//! A run moves each open slot through the same pipeline:
//!
//! 1. **Eligibility** - hard constraints (competencies, officer rank,
//!    unavailability, overlapping assignments)
//! 2. **Tiers** - enabled tiers consulted in fixed order, ranked on equity
//!    hours then seniority
//! 3. **Recording** - slot mutation, equity credit, and audit decision
//!
//! The [`orchestrator`] drives the pipeline slot by slot; [`lock`] keeps
//! concurrent runs for the same tenant apart.

pub mod eligibility;
pub mod equity;
pub mod lock;
pub mod orchestrator;
pub mod overtime;
pub mod recorder;
pub mod roster;
pub mod tiers;

pub use eligibility::{AvailabilityCoverage, EligibilityClassifier, Rejection, SlotRequirements};
pub use equity::{EquityLedger, PeriodKeys, day_key, period_key, week_key};
pub use lock::{RunGuard, RunLockRegistry};
pub use orchestrator::{RosterSnapshot, RunOutcome, run_attribution};
pub use overtime::OvertimeGate;
pub use recorder::AssignmentRecorder;
pub use roster::LiveRoster;
pub use tiers::{
    Candidate, FullTimeIncomplete, FullTimeOvertime, PartTimeAvailable, PartTimeStandby,
    SelectionContext, TierAssigner, TierSelection, TierStrategy,
};
