//! Overtime gate.
//!
//! Tier 5 (full-time employees already at their weekly cap) is only ever
//! consulted when the global overtime switch is on. The tier's own toggle
//! cannot open it.

use crate::config::AttributionConfig;

/// Global overtime permission for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvertimeGate {
    open: bool,
}

impl OvertimeGate {
    /// Reads the gate state from the run configuration.
    pub fn from_config(config: &AttributionConfig) -> Self {
        Self {
            open: config.overtime_enabled,
        }
    }

    /// Returns true if overtime assignments are permitted.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true if Tier 5 takes part in the run.
    ///
    /// Requires both an open gate and the tier's own toggle.
    pub fn admits_overtime_tier(&self, config: &AttributionConfig) -> bool {
        self.open && config.tier5_enabled
    }
}
