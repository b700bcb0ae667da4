//! Configuration for the shift attribution engine.
//!
//! This module provides the run configuration value object and the loader
//! for the default settings file.
//!
//! # Example
//!
//! ```no_run
//! use shift_attribution::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/attribution.yaml").unwrap();
//! println!("Equity window: {:?}", config.config().equity_window);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AttributionConfig, EquityWindow, SettingsFile};
