//! System endpoints: liveness and recorder pool health.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::recorder;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `"healthy"` when the check passed.
    pub status: String,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

impl HealthResponse {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `GET /health`: Service liveness.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::healthy()))
}

/// `GET /health/recorder`: Recorder pool round trip.
///
/// # Errors
///
/// Returns [`GatewayError::Persistence`] when the ping fails and
/// [`GatewayError::MissingConfiguration`] when the recorder is disabled.
#[utoipa::path(
    get,
    path = "/health/recorder",
    tag = "System",
    summary = "Recorder pool health",
    description = "Acquires a recorder connection and runs `SELECT 1`.",
    responses(
        (status = 200, description = "Recorder pool is healthy", body = HealthResponse),
        (status = 500, description = "Recorder not configured", body = ErrorResponse),
        (status = 503, description = "Recorder pool unavailable", body = ErrorResponse),
    )
)]
pub async fn recorder_health_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool = state.recorder_pool.as_ref().ok_or_else(|| {
        GatewayError::MissingConfiguration("recorder is disabled".to_string())
    })?;
    recorder::ping(pool).await?;
    Ok((StatusCode::OK, Json(HealthResponse::healthy())))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/recorder", get(recorder_health_handler))
}
