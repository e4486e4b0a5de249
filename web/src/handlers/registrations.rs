//! Registration submission and the cross-offering registration list.

use super::{offering_id, parse_query};
use crate::error::AppError;
use crate::extractors::RequestId;
use crate::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State, rejection::JsonRejection, rejection::PathRejection,
        rejection::QueryRejection,
    },
    http::StatusCode,
};
use serde::Deserialize;
use student_portal_core::{
    NewRegistration, OfferingId, OfferingKind, Registration, RegistrationEntry,
};

/// Query string for `GET /api/registrations`.
#[derive(Debug, Default, Deserialize)]
pub struct AllRegistrationsQuery {
    /// Only registrations for offerings of this kind.
    pub kind: Option<OfferingKind>,
}

/// Register for an offering.
///
/// # Endpoint
///
/// ```text
/// POST /api/offerings/:id/registrations
/// ```
///
/// # Request
///
/// ```json
/// {
///   "name": "Siti Rahma",
///   "email": "siti@example.com",
///   "phone": "081234567890",
///   "class_name": "XII IPA 2",
///   "motivation": "optional"
/// }
/// ```
///
/// # Status Codes
///
/// - 201 Created: registration recorded
/// - 400 Bad Request: malformed id or body
/// - 404 Not Found: unknown offering
/// - 409 Conflict: `CAPACITY_EXCEEDED` or `ALREADY_REGISTERED`
/// - 422 Unprocessable Entity: invalid fields, offering unavailable, outside the window
/// - 503 Service Unavailable: store unavailable after one retry
///
/// # Errors
///
/// See status codes above.
pub async fn register(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    path: Result<Path<OfferingId>, PathRejection>,
    body: Result<Json<NewRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    let id = offering_id(path)?;
    let Json(request) = body
        .map_err(|rejection| AppError::bad_request(format!("Invalid request body: {rejection}")))?;

    tracing::debug!(%request_id, offering_id = %id, "Registration submitted");

    let registration = state.registrations.register(id, request).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Registrations across all offerings with their offering titles, newest first.
///
/// # Endpoint
///
/// ```text
/// GET /api/registrations?kind=internship
/// ```
///
/// # Errors
///
/// 400 for a malformed query, 503 when the store is unavailable.
pub async fn list_all_registrations(
    State(state): State<AppState>,
    query: Result<Query<AllRegistrationsQuery>, QueryRejection>,
) -> Result<Json<Vec<RegistrationEntry>>, AppError> {
    let AllRegistrationsQuery { kind } = parse_query(query)?;
    Ok(Json(state.catalog.all_registrations(kind).await?))
}
