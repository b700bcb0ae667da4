//! Core data models for the shift attribution engine.
//!
//! This module contains the roster, personnel, and audit types the engine
//! reads and produces.

mod availability;
mod decision;
mod employee;
mod equity;
mod horizon;
mod run_summary;
mod shift;

pub use availability::{AvailabilityDeclaration, AvailabilityState};
pub use decision::{AssignmentDecision, CandidateSnapshot, Tier};
pub use employee::{Employee, EmploymentType};
pub use equity::EquityRecord;
pub use horizon::Horizon;
pub use run_summary::{FilledSlot, RunSummary, SkippedSlot, UnfillableReason, UnfilledSlot};
pub use shift::{AssignmentSource, ShiftSlot, ShiftType, SlotAssignment};
