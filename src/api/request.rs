//! Request types for the attribution API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AttributionConfig;

/// Request body for `POST /tenants/:tenant/attribution-runs`.
///
/// When `config` is omitted the server's loaded settings are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// First date of the horizon (inclusive).
    pub horizon_start: NaiveDate,
    /// Last date of the horizon (inclusive).
    pub horizon_end: NaiveDate,
    /// Per-run configuration override.
    #[serde(default)]
    pub config: Option<AttributionConfig>,
}
