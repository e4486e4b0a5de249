//! Error types for web handlers.
//!
//! Every failure leaves the API as a JSON body `{ "code", "message" }` with a
//! status derived from the registration error kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use student_portal_core::RegistrationError;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<OfferingView>, AppError> {
///     let view = state.catalog.get(id).await?;
///     Ok(Json(view))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map registration failures onto HTTP.
///
/// Capacity and duplicate failures are `409 Conflict` with distinct codes;
/// only store outages read as "try again".
impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        let status = match &err {
            RegistrationError::NotFound => StatusCode::NOT_FOUND,
            RegistrationError::CapacityExceeded | RegistrationError::AlreadyRegistered => {
                StatusCode::CONFLICT
            }
            RegistrationError::OfferingUnavailable(_)
            | RegistrationError::OutsideRegistrationWindow(_)
            | RegistrationError::InvalidRegistrant { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RegistrationError::TransientStoreError(_) => StatusCode::SERVICE_UNAVAILABLE,
            RegistrationError::ConstraintViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let app_error = Self::new(status, err.user_message(), err.code().to_string());
        if status.is_server_error() {
            app_error.with_source(anyhow::Error::new(err))
        } else {
            app_error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use student_portal_core::{UnavailableReason, WindowViolation};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn capacity_and_duplicate_are_distinct_conflicts() {
        let full = AppError::from(RegistrationError::CapacityExceeded);
        let dup = AppError::from(RegistrationError::AlreadyRegistered);

        assert_eq!(full.status, StatusCode::CONFLICT);
        assert_eq!(dup.status, StatusCode::CONFLICT);
        assert_eq!(full.code, "CAPACITY_EXCEEDED");
        assert_eq!(dup.code, "ALREADY_REGISTERED");
        assert!(!full.message.to_lowercase().contains("try again"));
        assert!(!dup.message.to_lowercase().contains("try again"));
    }

    #[test]
    fn offering_state_errors_are_unprocessable() {
        for err in [
            RegistrationError::OfferingUnavailable(UnavailableReason::Cancelled),
            RegistrationError::OutsideRegistrationWindow(WindowViolation::Closed),
            RegistrationError::InvalidRegistrant {
                field: "email",
                reason: "is required",
            },
        ] {
            assert_eq!(AppError::from(err).status, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn store_errors_keep_their_source() {
        let transient = AppError::from(RegistrationError::TransientStoreError("reset".into()));
        assert_eq!(transient.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(transient.source.is_some());

        let internal = AppError::from(RegistrationError::ConstraintViolation("check".into()));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.code, "INTERNAL_ERROR");
        assert!(!internal.message.contains("check"));
    }

    #[test]
    fn not_found_is_404() {
        let err = AppError::from(RegistrationError::NotFound);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "NOT_FOUND");
    }
}
