//! Equity ledger and period key derivation.
//!
//! The ledger tracks, per employee and per period key, the cumulative hours
//! assigned. Period keys are a pure function of a date and the configured
//! window, so a new period naturally starts every employee at zero and no
//! background reset is ever needed. Custom windows credit one key per day
//! and read the trailing days, so old hours age out the same way.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeDelta};
use rust_decimal::Decimal;

use crate::config::EquityWindow;
use crate::models::EquityRecord;

/// First Monday of the Unix epoch; fortnights are counted from here.
const FORTNIGHT_EPOCH: (i32, u32, u32) = (1970, 1, 5);

/// Returns the ISO-week key used for weekly cap checks.
///
/// # Example
///
/// ```
/// use shift_attribution::attribution::week_key;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
/// assert_eq!(week_key(date), "week:2026-W10");
/// ```
pub fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("week:{}-W{:02}", iso.year(), iso.week())
}

/// Derives the equity period key for a date.
///
/// Calendar windows name the week, fortnight or month containing `date`.
/// A custom window is trailing: its key names the N days ending on `date`,
/// and its hours are the sum of the per-day keys returned by [`day_key`].
///
/// # Example
///
/// ```
/// use shift_attribution::attribution::period_key;
/// use shift_attribution::config::EquityWindow;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
/// assert_eq!(period_key(date, EquityWindow::Monthly), "month:2026-03");
/// assert_eq!(period_key(date, EquityWindow::Custom(10)), "days10:2026-03-04");
/// ```
pub fn period_key(date: NaiveDate, window: EquityWindow) -> String {
    match window {
        EquityWindow::Weekly => week_key(date),
        EquityWindow::Biweekly => {
            let (y, m, d) = FORTNIGHT_EPOCH;
            let epoch = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
            format!("fortnight:{}", block_start(date, epoch, 14))
        }
        EquityWindow::Monthly => format!("month:{}", date.format("%Y-%m")),
        EquityWindow::Custom(days) => format!("days{}:{}", days.max(1), date),
    }
}

/// Returns the ledger key holding one day's hours, credited for custom windows.
pub fn day_key(date: NaiveDate) -> String {
    format!("day:{}", date)
}

/// Returns the first day of the `len`-day block containing `date`.
fn block_start(date: NaiveDate, origin: NaiveDate, len: u32) -> NaiveDate {
    let len = i64::from(len);
    let offset = (date - origin).num_days().div_euclid(len) * len;
    origin
        .checked_add_signed(TimeDelta::days(offset))
        .unwrap_or(origin)
}

/// The ledger keys an assignment on a given date reads and touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodKeys {
    /// Name of the equity window, recorded on decisions.
    pub equity: String,
    /// Key credited for the equity window.
    pub credit: String,
    /// Keys summed when reading equity hours.
    pub span: Vec<String>,
    /// ISO-week key, used for weekly cap checks.
    pub week: String,
}

impl PeriodKeys {
    /// Derives the keys for a date.
    pub fn for_date(date: NaiveDate, window: EquityWindow) -> Self {
        let equity = period_key(date, window);
        let (credit, span) = match window {
            EquityWindow::Custom(days) => {
                let span = (0..i64::from(days.max(1)))
                    .filter_map(|back| date.checked_sub_signed(TimeDelta::days(back)))
                    .map(day_key)
                    .collect();
                (day_key(date), span)
            }
            _ => (equity.clone(), vec![equity.clone()]),
        };
        Self {
            equity,
            credit,
            span,
            week: week_key(date),
        }
    }
}

/// Cumulative assigned hours per employee and period.
///
/// Credits are applied synchronously and are visible to the very next read,
/// which the run orchestrator relies on when ordering candidates slot after
/// slot.
#[derive(Debug, Clone, Default)]
pub struct EquityLedger {
    hours: HashMap<(String, String), Decimal>,
}

impl EquityLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted records.
    ///
    /// Duplicate records for the same employee and period are summed.
    pub fn from_records(records: impl IntoIterator<Item = EquityRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger.credit(&record.employee_id, &record.period_key, record.cumulative_hours);
        }
        ledger
    }

    /// Returns the hours credited to an employee in a period (zero if none).
    pub fn get(&self, employee_id: &str, period_key: &str) -> Decimal {
        self.hours
            .get(&(employee_id.to_string(), period_key.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the hours an employee holds in the equity window of `keys`.
    pub fn equity_hours(&self, employee_id: &str, keys: &PeriodKeys) -> Decimal {
        keys.span.iter().map(|key| self.get(employee_id, key)).sum()
    }

    /// Adds hours to an employee's total for a period, creating the record if needed.
    pub fn credit(&mut self, employee_id: &str, period_key: &str, hours: Decimal) {
        *self
            .hours
            .entry((employee_id.to_string(), period_key.to_string()))
            .or_insert(Decimal::ZERO) += hours;
    }

    /// Credits an assignment to both the equity and the weekly key.
    ///
    /// When the window is weekly both keys are identical and the hours are
    /// credited once.
    pub fn credit_assignment(&mut self, employee_id: &str, keys: &PeriodKeys, hours: Decimal) {
        self.credit(employee_id, &keys.credit, hours);
        if keys.week != keys.credit {
            self.credit(employee_id, &keys.week, hours);
        }
    }

    /// Returns every record, sorted by employee then period key.
    pub fn records(&self) -> Vec<EquityRecord> {
        let mut records: Vec<EquityRecord> = self
            .hours
            .iter()
            .map(|((employee_id, period_key), hours)| EquityRecord {
                employee_id: employee_id.clone(),
                period_key: period_key.clone(),
                cumulative_hours: *hours,
            })
            .collect();
        records.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then_with(|| a.period_key.cmp(&b.period_key))
        });
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_key_uses_iso_year() {
        // 2027-01-01 is a Friday in ISO week 53 of 2026
        assert_eq!(week_key(date(2027, 1, 1)), "week:2026-W53");
        assert_eq!(week_key(date(2026, 3, 2)), "week:2026-W10");
        assert_eq!(week_key(date(2026, 3, 8)), "week:2026-W10");
        assert_eq!(week_key(date(2026, 3, 9)), "week:2026-W11");
    }

    #[test]
    fn test_biweekly_blocks_start_on_monday() {
        let key = period_key(date(2026, 3, 4), EquityWindow::Biweekly);
        let start = NaiveDate::parse_from_str(key.trim_start_matches("fortnight:"), "%Y-%m-%d")
            .unwrap();
        assert_eq!(start.weekday(), chrono::Weekday::Mon);
        assert!(start <= date(2026, 3, 4));
        assert!(date(2026, 3, 4) < start + TimeDelta::days(14));

        // Every day of the block shares the key
        for offset in 0..14 {
            let day = start + TimeDelta::days(offset);
            assert_eq!(period_key(day, EquityWindow::Biweekly), key);
        }
        assert_ne!(
            period_key(start + TimeDelta::days(14), EquityWindow::Biweekly),
            key
        );
    }

    #[test]
    fn test_monthly_key() {
        assert_eq!(
            period_key(date(2026, 2, 28), EquityWindow::Monthly),
            "month:2026-02"
        );
        assert_eq!(
            period_key(date(2026, 3, 1), EquityWindow::Monthly),
            "month:2026-03"
        );
    }

    #[test]
    fn test_custom_window_spans_trailing_days() {
        let keys = PeriodKeys::for_date(date(2026, 3, 10), EquityWindow::Custom(3));
        assert_eq!(keys.equity, "days3:2026-03-10");
        assert_eq!(keys.credit, "day:2026-03-10");
        assert_eq!(
            keys.span,
            vec!["day:2026-03-10", "day:2026-03-09", "day:2026-03-08"]
        );
        assert_eq!(keys.week, "week:2026-W11");
    }

    #[test]
    fn test_custom_window_hours_age_out() {
        let mut ledger = EquityLedger::new();
        let monday = PeriodKeys::for_date(date(2026, 3, 2), EquityWindow::Custom(14));
        ledger.credit_assignment("emp_001", &monday, Decimal::new(12, 0));

        // Across a run boundary, still inside the 14 trailing days
        let next_week = PeriodKeys::for_date(date(2026, 3, 9), EquityWindow::Custom(14));
        assert_eq!(ledger.equity_hours("emp_001", &next_week), Decimal::new(12, 0));

        let last_day = PeriodKeys::for_date(date(2026, 3, 15), EquityWindow::Custom(14));
        assert_eq!(ledger.equity_hours("emp_001", &last_day), Decimal::new(12, 0));

        let gone = PeriodKeys::for_date(date(2026, 3, 16), EquityWindow::Custom(14));
        assert_eq!(ledger.equity_hours("emp_001", &gone), Decimal::ZERO);
    }

    #[test]
    fn test_get_defaults_to_zero() {
        let ledger = EquityLedger::new();
        assert_eq!(ledger.get("emp_001", "week:2026-W10"), Decimal::ZERO);
    }

    #[test]
    fn test_credit_is_visible_immediately() {
        let mut ledger = EquityLedger::new();
        ledger.credit("emp_001", "week:2026-W10", Decimal::new(12, 0));
        assert_eq!(ledger.get("emp_001", "week:2026-W10"), Decimal::new(12, 0));
        ledger.credit("emp_001", "week:2026-W10", Decimal::new(12, 0));
        assert_eq!(ledger.get("emp_001", "week:2026-W10"), Decimal::new(24, 0));
    }

    #[test]
    fn test_new_period_starts_at_zero() {
        let mut ledger = EquityLedger::new();
        ledger.credit("emp_001", "week:2026-W10", Decimal::new(36, 0));
        assert_eq!(ledger.get("emp_001", "week:2026-W11"), Decimal::ZERO);
    }

    #[test]
    fn test_credit_assignment_weekly_credits_once() {
        let mut ledger = EquityLedger::new();
        let keys = PeriodKeys::for_date(date(2026, 3, 4), EquityWindow::Weekly);
        assert_eq!(keys.equity, keys.week);

        ledger.credit_assignment("emp_001", &keys, Decimal::new(12, 0));
        assert_eq!(ledger.get("emp_001", &keys.week), Decimal::new(12, 0));
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn test_credit_assignment_monthly_credits_both_keys() {
        let mut ledger = EquityLedger::new();
        let keys = PeriodKeys::for_date(date(2026, 3, 4), EquityWindow::Monthly);

        ledger.credit_assignment("emp_001", &keys, Decimal::new(12, 0));
        assert_eq!(ledger.get("emp_001", "month:2026-03"), Decimal::new(12, 0));
        assert_eq!(ledger.get("emp_001", "week:2026-W10"), Decimal::new(12, 0));
    }

    #[test]
    fn test_records_round_trip_through_ledger() {
        let mut ledger = EquityLedger::new();
        ledger.credit("emp_b", "week:2026-W10", Decimal::new(4, 0));
        ledger.credit("emp_a", "week:2026-W10", Decimal::new(10, 0));

        let records = ledger.records();
        assert_eq!(records[0].employee_id, "emp_a");
        assert_eq!(records[1].employee_id, "emp_b");

        let rebuilt = EquityLedger::from_records(records);
        assert_eq!(rebuilt.get("emp_a", "week:2026-W10"), Decimal::new(10, 0));
        assert_eq!(rebuilt.get("emp_b", "week:2026-W10"), Decimal::new(4, 0));
    }
}
