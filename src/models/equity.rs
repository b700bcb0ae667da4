//! Equity record model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cumulative assigned hours for one employee within one equity period.
///
/// Records are created lazily on the first credit in a period. A new period
/// key starts every employee at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityRecord {
    /// The employee the hours belong to.
    pub employee_id: String,
    /// Period key derived from the equity window (e.g., "week:2026-W10").
    pub period_key: String,
    /// Hours credited in the period.
    pub cumulative_hours: Decimal,
}
