//! HTTP API for the attribution engine.
//!
//! Two endpoints: trigger a run for a tenant over a horizon, and fetch the
//! decision that explains a slot's current automatic occupant.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::RunRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
