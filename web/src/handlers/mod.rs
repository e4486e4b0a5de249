//! HTTP request handlers.

pub mod health;
pub mod offerings;
pub mod registrations;

pub use health::{health_check, readiness_check};

use crate::error::AppError;
use axum::extract::{Path, Query, rejection::PathRejection, rejection::QueryRejection};
use student_portal_core::OfferingId;

/// Unwrap an offering id path segment, answering malformed ids with a JSON 400.
pub(crate) fn offering_id(path: Result<Path<OfferingId>, PathRejection>) -> Result<OfferingId, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::bad_request(format!("Invalid offering id: {rejection}")))
}

/// Unwrap a query string, answering malformed ones with a JSON 400.
pub(crate) fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| AppError::bad_request(format!("Invalid query: {rejection}")))
}
