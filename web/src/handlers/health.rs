//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

/// Simple health check endpoint (for basic liveness).
///
/// This endpoint does NOT check dependencies (database, etc.).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness check: the offering store must answer.
///
/// # Status Codes
///
/// - 200 OK: store reachable
/// - 503 Service Unavailable: store unreachable
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
///
/// # Errors
///
/// Returns [`AppError`] with 503 when the store does not answer.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.catalog.ready().await?;
    Ok(Json(json!({ "status": "ready" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
