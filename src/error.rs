//! Error types for the shift attribution engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts an attribution run or a lookup. Per-slot
//! problems (unfillable or inconsistent slots) are not errors; they are
//! reported in the run summary instead.

use thiserror::Error;

/// The main error type for the shift attribution engine.
///
/// # Example
///
/// ```
/// use shift_attribution::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/attribution.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/attribution.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The run configuration is invalid; the run is aborted before any write.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfiguration {
        /// The configuration field (or horizon) at fault.
        field: String,
        /// A description of what made the configuration invalid.
        message: String,
    },

    /// Another run is already in progress for the same tenant and horizon.
    #[error("An attribution run is already in progress for tenant '{tenant}' ({horizon})")]
    ConcurrentRunRejected {
        /// The tenant whose run was rejected.
        tenant: String,
        /// The horizon of the rejected run.
        horizon: String,
    },

    /// A slot references data absent from the snapshot.
    #[error("Inconsistent data for slot '{slot_id}': {message}")]
    DataInconsistency {
        /// The affected slot.
        slot_id: String,
        /// What was missing or contradictory.
        message: String,
    },

    /// An attempt was made to write over a manually placed assignment.
    #[error("Slot '{slot_id}' carries a manual assignment and cannot be written by the engine")]
    ManualSlotProtected {
        /// The protected slot.
        slot_id: String,
    },

    /// No assignment decision exists for the slot.
    #[error("No assignment decision recorded for slot '{slot_id}'")]
    DecisionNotFound {
        /// The slot that was looked up.
        slot_id: String,
    },

    /// The backing store failed.
    #[error("Store error: {message}")]
    StoreError {
        /// A description of the store failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
