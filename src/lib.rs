//! Automatic shift attribution for fire department duty rosters.
//!
//! Given a horizon, the engine fills every open roster slot by walking a
//! fixed tier hierarchy (part-timers declared available, part-timers on
//! standby, full-timers below their weekly cap, then full-timers on
//! overtime) and picks, within a tier, the person with the fewest hours in
//! the current equity window. Manual assignments are never touched, and
//! every automatic choice is recorded with the comparison that led to it.

#![warn(missing_docs)]

pub mod api;
pub mod attribution;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
