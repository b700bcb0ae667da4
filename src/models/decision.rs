//! Assignment decision models.
//!
//! An [`AssignmentDecision`] is the append-only audit entry written for every
//! automatic assignment. It captures the candidate comparison as it stood at
//! decision time so the roster view can show why a person was chosen without
//! recomputing anything from data that may since have drifted.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The configurable tiers consulted for a slot, in precedence order.
///
/// Tiers 0 (shift-type priority) and 1 (manual assignments) are fixed
/// behaviours of the run orchestrator and never appear on a decision.
///
/// Serialized as its tier number.
///
/// # Example
///
/// ```
/// use shift_attribution::models::Tier;
///
/// assert_eq!(Tier::FullTimeIncomplete.number(), 4);
/// assert_eq!(serde_json::to_string(&Tier::PartTimeStandby).unwrap(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Tier 2: part-time employees with an `available` declaration covering the slot.
    PartTimeAvailable,
    /// Tier 3: part-time employees with no declaration for the slot (standby pool).
    PartTimeStandby,
    /// Tier 4: full-time employees below their weekly cap.
    FullTimeIncomplete,
    /// Tier 5: full-time employees at or above their weekly cap (overtime).
    FullTimeOvertime,
}

impl Tier {
    /// All configurable tiers in precedence order.
    pub const ALL: [Tier; 4] = [
        Tier::PartTimeAvailable,
        Tier::PartTimeStandby,
        Tier::FullTimeIncomplete,
        Tier::FullTimeOvertime,
    ];

    /// Returns the tier number as shown in the settings screens.
    pub fn number(self) -> u8 {
        match self {
            Tier::PartTimeAvailable => 2,
            Tier::PartTimeStandby => 3,
            Tier::FullTimeIncomplete => 4,
            Tier::FullTimeOvertime => 5,
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Tier::PartTimeAvailable),
            3 => Ok(Tier::PartTimeStandby),
            4 => Ok(Tier::FullTimeIncomplete),
            5 => Ok(Tier::FullTimeOvertime),
            other => Err(format!("unknown configurable tier: {}", other)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.number())
    }
}

/// One candidate as compared at the winning tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// 1-based position after tier ordering.
    pub rank: u32,
    /// The candidate.
    pub employee_id: String,
    /// Tier the candidate was classified into.
    pub tier: Tier,
    /// Cumulative hours in the active equity period before this decision.
    pub equity_hours: Decimal,
    /// Hours already credited in the slot's calendar week.
    pub week_hours: Decimal,
    /// Configured weekly hour ceiling.
    pub weekly_hour_cap: Decimal,
    /// Hours remaining until the weekly cap (negative once past it).
    pub hours_remaining: Decimal,
    /// Hire date used as the tie-break.
    pub seniority_date: NaiveDate,
    /// Whether this candidate was chosen.
    pub selected: bool,
    /// Why the candidate failed re-validation at selection time, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

/// Immutable audit entry for one automatic assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDecision {
    /// Unique identifier for this decision.
    pub decision_id: Uuid,
    /// The run that produced the decision.
    pub run_id: Uuid,
    /// The slot that was filled.
    pub slot_id: String,
    /// The chosen employee.
    pub employee_id: String,
    /// The tier the employee was drawn from.
    pub tier: Tier,
    /// Equity period key the comparison was made in.
    pub period_key: String,
    /// Hours credited to the employee for this slot.
    pub slot_hours: Decimal,
    /// Every candidate considered at the winning tier, in rank order.
    pub candidates: Vec<CandidateSnapshot>,
    /// When the decision was taken.
    pub decided_at: DateTime<Utc>,
}

impl AssignmentDecision {
    /// Returns the snapshot of the chosen candidate.
    pub fn selected_candidate(&self) -> Option<&CandidateSnapshot> {
        self.candidates.iter().find(|c| c.selected)
    }
}
