//! Run summary models.
//!
//! This module contains the [`RunSummary`] returned by an attribution run and
//! the per-slot outcome entries it aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssignmentDecision, Horizon, Tier};
use crate::config::EquityWindow;

/// Why a slot could not be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfillableReason {
    /// Every employee was rejected by the eligibility classifier.
    NoEligibleCandidate,
    /// Eligible employees existed but no enabled tier yielded one.
    AllTiersExhausted,
}

/// A slot filled during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledSlot {
    /// The filled slot.
    pub slot_id: String,
    /// The employee placed on it.
    pub employee_id: String,
    /// The tier the employee came from.
    pub tier: Tier,
}

/// A slot left unfilled. Not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfilledSlot {
    /// The slot left empty.
    pub slot_id: String,
    /// Why it stayed empty.
    pub reason: UnfillableReason,
    /// Number of employees that passed eligibility.
    pub eligible_candidates: usize,
}

/// A slot skipped because its data is inconsistent with the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSlot {
    /// The skipped slot.
    pub slot_id: String,
    /// Description of the inconsistency.
    pub reason: String,
}

/// The result of one attribution run.
///
/// Manual slots and slots already filled by an earlier run are left alone and
/// appear in none of the lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// The tenant (fire department) the run was for.
    pub tenant: String,
    /// The horizon covered.
    pub horizon: Horizon,
    /// The equity window in force.
    pub equity_window: EquityWindow,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Slots filled by this run.
    pub filled: Vec<FilledSlot>,
    /// Slots that could not be filled.
    pub unfilled: Vec<UnfilledSlot>,
    /// Slots skipped for inconsistent data.
    pub skipped: Vec<SkippedSlot>,
    /// One decision per filled slot, in processing order.
    pub decisions: Vec<AssignmentDecision>,
    /// Total run duration in microseconds.
    pub duration_us: u64,
}

impl RunSummary {
    /// Returns the number of slots filled.
    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }

    /// Returns the number of slots left unfilled.
    pub fn unfilled_count(&self) -> usize {
        self.unfilled.len()
    }

    /// Returns the filled entry for a slot, if it was filled by this run.
    pub fn filled_slot(&self, slot_id: &str) -> Option<&FilledSlot> {
        self.filled.iter().find(|f| f.slot_id == slot_id)
    }

    /// Returns the unfilled entry for a slot, if it stayed empty.
    pub fn unfilled_slot(&self, slot_id: &str) -> Option<&UnfilledSlot> {
        self.unfilled.iter().find(|u| u.slot_id == slot_id)
    }
}
