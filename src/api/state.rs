//! Application state shared by the request handlers.

use std::sync::Arc;

use crate::config::{AttributionConfig, ConfigLoader};
use crate::service::AttributionService;

/// Shared application state.
///
/// Holds the attribution service and the settings used when a run request
/// carries no configuration of its own.
#[derive(Clone)]
pub struct AppState {
    service: AttributionService,
    settings: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates the state from a service and the loaded settings.
    pub fn new(service: AttributionService, settings: ConfigLoader) -> Self {
        Self {
            service,
            settings: Arc::new(settings),
        }
    }

    /// Returns the attribution service.
    pub fn service(&self) -> &AttributionService {
        &self.service
    }

    /// Returns the default run configuration.
    pub fn default_config(&self) -> &AttributionConfig {
        self.settings.config()
    }
}
