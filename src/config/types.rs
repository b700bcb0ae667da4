//! Configuration types for shift attribution.
//!
//! [`AttributionConfig`] is the immutable value object handed to every run.
//! The engine never reads settings from anywhere else, so a run is fully
//! determined by its inputs.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Horizon, Tier};

/// The window over which cumulative hours are compared for fairness.
///
/// # Example
///
/// ```
/// use shift_attribution::config::EquityWindow;
///
/// let window: EquityWindow = serde_json::from_str(r#"{"custom": 10}"#).unwrap();
/// assert_eq!(window, EquityWindow::Custom(10));
/// assert_eq!(serde_json::to_string(&EquityWindow::Biweekly).unwrap(), "\"biweekly\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityWindow {
    /// ISO calendar week.
    #[default]
    Weekly,
    /// Two-week block aligned on Mondays.
    Biweekly,
    /// Calendar month.
    Monthly,
    /// Trailing N days ending on the slot's date.
    Custom(u32),
}

/// Settings for one attribution run.
///
/// Missing fields take their default: every tier enabled, overtime closed,
/// weekly equity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Tier 2: part-time employees declared available.
    pub tier2_enabled: bool,
    /// Tier 3: part-time employees on standby (no declaration).
    pub tier3_enabled: bool,
    /// Tier 4: full-time employees below their weekly cap.
    pub tier4_enabled: bool,
    /// Tier 5: full-time employees at their cap. Only reachable with overtime enabled.
    pub tier5_enabled: bool,
    /// Global overtime permission.
    pub overtime_enabled: bool,
    /// Equity comparison window.
    pub equity_window: EquityWindow,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            tier2_enabled: true,
            tier3_enabled: true,
            tier4_enabled: true,
            tier5_enabled: true,
            overtime_enabled: false,
            equity_window: EquityWindow::Weekly,
        }
    }
}

impl AttributionConfig {
    /// Returns the toggle for a configurable tier.
    ///
    /// This is the tier's own switch only; Tier 5 additionally depends on
    /// the overtime gate.
    pub fn tier_enabled(&self, tier: Tier) -> bool {
        match tier {
            Tier::PartTimeAvailable => self.tier2_enabled,
            Tier::PartTimeStandby => self.tier3_enabled,
            Tier::FullTimeIncomplete => self.tier4_enabled,
            Tier::FullTimeOvertime => self.tier5_enabled,
        }
    }

    /// Validates the configuration against the horizon it will run over.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if:
    /// - the custom equity window spans zero days
    /// - the horizon is empty
    /// - no tier can ever yield a candidate (tiers 2-4 disabled and Tier 5
    ///   disabled or overtime closed)
    pub fn validate(&self, horizon: &Horizon) -> EngineResult<()> {
        if self.equity_window == EquityWindow::Custom(0) {
            return Err(EngineError::InvalidConfiguration {
                field: "equity_window".to_string(),
                message: "custom window must span at least one day".to_string(),
            });
        }

        if horizon.is_empty() {
            return Err(EngineError::InvalidConfiguration {
                field: "horizon".to_string(),
                message: format!(
                    "horizon end {} is before its start {}",
                    horizon.end_date, horizon.start_date
                ),
            });
        }

        let overtime_reachable = self.tier5_enabled && self.overtime_enabled;
        if !self.tier2_enabled && !self.tier3_enabled && !self.tier4_enabled && !overtime_reachable
        {
            return Err(EngineError::InvalidConfiguration {
                field: "tiers".to_string(),
                message: "every tier is disabled and overtime is closed; the run would fill nothing"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Raw settings file structure as written by the administrative screens.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Tier 2 toggle.
    #[serde(default = "enabled")]
    pub tier2_enabled: bool,
    /// Tier 3 toggle.
    #[serde(default = "enabled")]
    pub tier3_enabled: bool,
    /// Tier 4 toggle.
    #[serde(default = "enabled")]
    pub tier4_enabled: bool,
    /// Tier 5 toggle.
    #[serde(default = "enabled")]
    pub tier5_enabled: bool,
    /// Overtime switch.
    #[serde(default)]
    pub overtime_enabled: bool,
    /// One of "weekly", "biweekly", "monthly", "custom".
    #[serde(default = "default_window")]
    pub equity_window: String,
    /// Length of a custom window in days.
    #[serde(default)]
    pub equity_window_days: Option<u32>,
}

fn enabled() -> bool {
    true
}

fn default_window() -> String {
    "weekly".to_string()
}

impl SettingsFile {
    /// Converts the raw settings into a run configuration.
    ///
    /// Returns a description of the problem when the window is unknown or a
    /// custom window lacks its length.
    pub fn into_config(self) -> Result<AttributionConfig, String> {
        let equity_window = match self.equity_window.trim().to_lowercase().as_str() {
            "weekly" => EquityWindow::Weekly,
            "biweekly" => EquityWindow::Biweekly,
            "monthly" => EquityWindow::Monthly,
            "custom" => match self.equity_window_days {
                Some(days) => EquityWindow::Custom(days),
                None => return Err("custom equity window requires equity_window_days".to_string()),
            },
            other => return Err(format!("unknown equity window: {}", other)),
        };

        Ok(AttributionConfig {
            tier2_enabled: self.tier2_enabled,
            tier3_enabled: self.tier3_enabled,
            tier4_enabled: self.tier4_enabled,
            tier5_enabled: self.tier5_enabled,
            overtime_enabled: self.overtime_enabled,
            equity_window,
        })
    }
}
