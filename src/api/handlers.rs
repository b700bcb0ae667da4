//! HTTP request handlers for the attribution API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use super::request::RunRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tenants/:tenant/attribution-runs", post(run_handler))
        .route("/decisions/:slot_id", get(decision_handler))
        .with_state(state)
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn error_response(error: ApiErrorResponse) -> Response {
    (
        error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error.error),
    )
        .into_response()
}

/// Handler for `POST /tenants/:tenant/attribution-runs`.
///
/// Runs the attribution over the requested horizon and returns the summary.
async fn run_handler(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, tenant = %tenant, "Processing attribution run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = json_rejection(correlation_id, rejection);
            return error_response(ApiErrorResponse::bad_request(error));
        }
    };

    let config = request
        .config
        .unwrap_or_else(|| state.default_config().clone());

    // Runs are synchronous and hold store locks
    let service = state.service().clone();
    let run_tenant = tenant.clone();
    let start_time = Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        service.run_auto_assignment(
            &run_tenant,
            request.horizon_start,
            request.horizon_end,
            &config,
        )
    })
    .await;

    let result = match result {
        Ok(result) => result,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Attribution run task failed");
            return error_response(ApiErrorResponse::internal(ApiError::new(
                "INTERNAL_ERROR",
                "Attribution run did not complete",
            )));
        }
    };

    match result {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %summary.run_id,
                filled = summary.filled_count(),
                unfilled = summary.unfilled_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Attribution run completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(summary),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                tenant = %tenant,
                error = %err,
                "Attribution run failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for `GET /decisions/:slot_id`.
///
/// Returns the latest decision recorded for the slot.
async fn decision_handler(State(state): State<AppState>, Path(slot_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.service().get_decision_trail(&slot_id) {
        Ok(decision) => {
            info!(
                correlation_id = %correlation_id,
                slot_id = %slot_id,
                decision_id = %decision.decision_id,
                "Decision trail served"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(decision),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                slot_id = %slot_id,
                error = %err,
                "Decision lookup failed"
            );
            error_response(err.into())
        }
    }
}
