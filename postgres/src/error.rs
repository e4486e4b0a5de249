//! Classification of `sqlx` failures into [`RegistrationError`] kinds.

use student_portal_core::RegistrationError;
use student_portal_core::error::IDENTITY_CONSTRAINT;

/// Primary key of `registrations`. A retry reuses its registration id, so
/// hitting this means the earlier attempt's row is already stored.
pub const REGISTRATION_KEY_CONSTRAINT: &str = "registrations_pkey";

/// SQLSTATE codes worth one more try: serialization failure, deadlock,
/// lock not available, query cancelled, admin shutdown, cannot connect now.
const RETRYABLE_SQLSTATES: &[&str] = &["40001", "40P01", "55P03", "57014", "57P01", "57P03"];

/// Map a `sqlx` error onto the registration error taxonomy.
///
/// - unique violation on `registrations_offering_identity_key` or
///   `registrations_pkey` → [`RegistrationError::AlreadyRegistered`]
/// - connection, pool, timeout and serialization failures →
///   [`RegistrationError::TransientStoreError`]
/// - everything else → [`RegistrationError::ConstraintViolation`]
#[must_use]
pub fn map_sqlx_error(err: sqlx::Error) -> RegistrationError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation()
                && matches!(
                    db_err.constraint(),
                    Some(IDENTITY_CONSTRAINT | REGISTRATION_KEY_CONSTRAINT)
                )
            {
                return RegistrationError::AlreadyRegistered;
            }

            let retryable = db_err
                .code()
                .is_some_and(|code| code.starts_with("08") || RETRYABLE_SQLSTATES.contains(&&*code));
            if retryable {
                RegistrationError::TransientStoreError(db_err.message().to_string())
            } else {
                RegistrationError::ConstraintViolation(db_err.message().to_string())
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => RegistrationError::TransientStoreError(err.to_string()),
        _ => RegistrationError::ConstraintViolation(err.to_string()),
    }
}

/// Decode failure for a column.
pub(crate) fn invalid_column(column: &str, err: impl std::fmt::Display) -> RegistrationError {
    RegistrationError::ConstraintViolation(format!("invalid value in column {column}: {err}"))
}
