pub mod calculate;

use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub use calculate::calculate;

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "calculator-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check: the vision provider must be reachable.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state
        .analyzer
        .provider()
        .health_check()
        .await
        .map_err(|e| {
            tracing::warn!("Readiness check failed: {}", e);
            AppError::ServiceUnavailable
        })?;

    Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
}
