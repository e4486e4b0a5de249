//! Error taxonomy for registration.
//!
//! Every failure the presentation layer can see is a [`RegistrationError`]
//! variant, so callers branch on the kind instead of parsing messages. Each
//! kind maps to one stable [`code`](RegistrationError::code) and one
//! [`user_message`](RegistrationError::user_message).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Name of the unique constraint on `(offering_id, identity_key)`.
///
/// A unique violation on this constraint means the registrant is already
/// enrolled; any other constraint firing is unexpected.
pub const IDENTITY_CONSTRAINT: &str = "registrations_offering_identity_key";

/// Why an offering refuses registrations outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Called off by an administrator.
    Cancelled,
    /// Already took place.
    Completed,
    /// Explicitly deactivated.
    Inactive,
}

impl UnavailableReason {
    /// Lower-case label used in messages and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the registration window was missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowViolation {
    /// Before `start_date`.
    NotYetOpen,
    /// After `end_date` or `registration_deadline`.
    Closed,
}

/// Registration failure kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    // ═══════════════════════════════════════════════════════════
    // Admission (terminal for this attempt)
    // ═══════════════════════════════════════════════════════════

    /// The offering does not exist.
    #[error("Offering not found")]
    NotFound,

    /// The offering's administrative status refuses registrations.
    #[error("Offering is {0}")]
    OfferingUnavailable(UnavailableReason),

    /// Current time is outside the registration window.
    #[error("Outside registration window ({0:?})")]
    OutsideRegistrationWindow(WindowViolation),

    /// No places left.
    #[error("Offering capacity exceeded")]
    CapacityExceeded,

    /// The registrant already holds a registration for this offering.
    #[error("Already registered for this offering")]
    AlreadyRegistered,

    /// A submitted field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidRegistrant {
        /// Field name as submitted by the form.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    // ═══════════════════════════════════════════════════════════
    // Store
    // ═══════════════════════════════════════════════════════════

    /// Network failure, timeout or serialization conflict. Safe to retry.
    #[error("Transient store error: {0}")]
    TransientStoreError(String),

    /// The store rejected a write for a reason other than identity
    /// uniqueness. Surfaced as an internal error.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RegistrationError {
    /// Only transient store failures may be retried automatically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStoreError(_))
    }

    /// Whether the failure was caused by the request or offering state
    /// rather than by infrastructure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::TransientStoreError(_) | Self::ConstraintViolation(_)
        )
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::OfferingUnavailable(_) => "OFFERING_UNAVAILABLE",
            Self::OutsideRegistrationWindow(_) => "OUTSIDE_REGISTRATION_WINDOW",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::InvalidRegistrant { .. } => "VALIDATION_ERROR",
            Self::TransientStoreError(_) => "SERVICE_UNAVAILABLE",
            Self::ConstraintViolation(_) => "INTERNAL_ERROR",
        }
    }

    /// Short label for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::OfferingUnavailable(_) => "unavailable",
            Self::OutsideRegistrationWindow(_) => "outside_window",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::AlreadyRegistered => "already_registered",
            Self::InvalidRegistrant { .. } => "invalid_registrant",
            Self::TransientStoreError(_) => "transient",
            Self::ConstraintViolation(_) => "constraint_violation",
        }
    }

    /// Message shown to the student.
    ///
    /// Capacity and duplicate failures never read as "try again": retrying
    /// cannot succeed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "This offering could not be found.".to_string(),
            Self::OfferingUnavailable(UnavailableReason::Cancelled) => {
                "This offering has been cancelled.".to_string()
            }
            Self::OfferingUnavailable(UnavailableReason::Completed) => {
                "This offering has already taken place.".to_string()
            }
            Self::OfferingUnavailable(UnavailableReason::Inactive) => {
                "This offering is no longer active.".to_string()
            }
            Self::OutsideRegistrationWindow(WindowViolation::NotYetOpen) => {
                "Registration for this offering has not opened yet.".to_string()
            }
            Self::OutsideRegistrationWindow(WindowViolation::Closed) => {
                "Registration for this offering has closed.".to_string()
            }
            Self::CapacityExceeded => {
                "This offering is full. No places are left.".to_string()
            }
            Self::AlreadyRegistered => {
                "You are already registered for this offering.".to_string()
            }
            Self::InvalidRegistrant { field, reason } => format!("Please check {field}: {reason}."),
            Self::TransientStoreError(_) => {
                "The service is temporarily unavailable. Please try again shortly.".to_string()
            }
            Self::ConstraintViolation(_) => {
                "Something went wrong while saving your registration.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(RegistrationError::TransientStoreError("timeout".into()).is_retryable());
        assert!(!RegistrationError::CapacityExceeded.is_retryable());
        assert!(!RegistrationError::AlreadyRegistered.is_retryable());
        assert!(!RegistrationError::ConstraintViolation("fk".into()).is_retryable());
    }

    #[test]
    fn capacity_and_duplicate_messages_do_not_suggest_retrying() {
        for err in [
            RegistrationError::CapacityExceeded,
            RegistrationError::AlreadyRegistered,
        ] {
            assert!(!err.user_message().to_lowercase().contains("try again"));
        }
        assert_ne!(
            RegistrationError::CapacityExceeded.user_message(),
            RegistrationError::AlreadyRegistered.user_message()
        );
    }

    #[test]
    fn unavailable_display_includes_reason() {
        let err = RegistrationError::OfferingUnavailable(UnavailableReason::Cancelled);
        assert_eq!(err.to_string(), "Offering is cancelled");
        assert_eq!(err.code(), "OFFERING_UNAVAILABLE");
    }

    #[test]
    fn store_failures_are_not_rejections() {
        assert!(RegistrationError::NotFound.is_rejection());
        assert!(!RegistrationError::TransientStoreError("reset".into()).is_rejection());
        assert!(!RegistrationError::ConstraintViolation("check".into()).is_rejection());
    }
}
