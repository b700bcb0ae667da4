//! Run exclusion.
//!
//! At most one run may be in flight per tenant over any given date. A second
//! request whose horizon overlaps an in-flight run for the same tenant is
//! rejected immediately, never queued.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::Horizon;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunScope {
    tenant: String,
    horizon: Horizon,
}

/// Registry of in-flight runs.
#[derive(Debug, Clone, Default)]
pub struct RunLockRegistry {
    active: Arc<Mutex<Vec<RunScope>>>,
}

impl RunLockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the tenant/horizon scope for the duration of a run.
    ///
    /// The claim is released when the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentRunRejected` if an overlapping run is in flight.
    pub fn acquire(&self, tenant: &str, horizon: Horizon) -> EngineResult<RunGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        if active
            .iter()
            .any(|scope| scope.tenant == tenant && scope.horizon.overlaps(&horizon))
        {
            warn!(tenant = %tenant, horizon = %horizon, "Concurrent attribution run rejected");
            return Err(EngineError::ConcurrentRunRejected {
                tenant: tenant.to_string(),
                horizon: horizon.to_string(),
            });
        }

        let scope = RunScope {
            tenant: tenant.to_string(),
            horizon,
        };
        active.push(scope.clone());

        Ok(RunGuard {
            active: Arc::clone(&self.active),
            scope,
        })
    }

    /// Returns true if a run is in flight for the tenant.
    pub fn is_running(&self, tenant: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|scope| scope.tenant == tenant)
    }
}

/// Holds a run scope; releases it on drop.
#[derive(Debug)]
pub struct RunGuard {
    active: Arc<Mutex<Vec<RunScope>>>,
    scope: RunScope,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(position) = active.iter().position(|scope| *scope == self.scope) {
            active.swap_remove(position);
        }
    }
}
