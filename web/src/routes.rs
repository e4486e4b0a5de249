//! Router configuration.

use crate::handlers::{health, offerings, registrations};
use crate::middleware::request_id_layer;
use crate::state::AppState;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;

/// Build the public API router.
///
/// - `GET  /health`, `GET /ready`
/// - `GET  /api/offerings`, `GET /api/offerings/summary`, `GET /api/offerings/:id`
/// - `GET  /api/offerings/:id/registrations`, `POST /api/offerings/:id/registrations`
/// - `GET  /api/registrations`
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/offerings", get(offerings::list_offerings))
        .route("/offerings/summary", get(offerings::offerings_summary))
        .route("/offerings/:id", get(offerings::get_offering))
        .route(
            "/offerings/:id/registrations",
            get(offerings::list_registrations).post(registrations::register),
        )
        .route("/registrations", get(registrations::list_all_registrations));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(request_id_layer())
        .with_state(state)
}

/// Router serving Prometheus text format at `/metrics`.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}
