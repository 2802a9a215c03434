//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// `AuthenticationFailed` deliberately carries no detail: a missing account
/// and a wrong password must be indistinguishable to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad email or bad password (uniform on purpose).
    #[error("Invalid email or password")]
    AuthenticationFailed,

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A cross-table reference resolves to a row owned by a different institution.
    #[error("Tenant mismatch: {0}")]
    TenantMismatch(String),

    /// Restrict-policy violation: dependent rows still exist.
    #[error("Delete blocked: {0}")]
    DeleteBlocked(String),

    /// Uniqueness violation; the message names the rule that fired.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::AuthenticationFailed => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::ConstraintViolation(_) | Self::DeleteBlocked(_) => 409,
            Self::TenantMismatch(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::TenantMismatch(_) => "TENANT_MISMATCH",
            Self::DeleteBlocked(_) => "DELETE_BLOCKED",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::AuthenticationFailed.status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::TenantMismatch(String::new()).status_code(), 422);
        assert_eq!(AppError::DeleteBlocked(String::new()).status_code(), 409);
        assert_eq!(
            AppError::ConstraintViolation(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::AuthenticationFailed.error_code(),
            "AUTHENTICATION_FAILED"
        );
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "FORBIDDEN");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::TenantMismatch(String::new()).error_code(),
            "TENANT_MISMATCH"
        );
        assert_eq!(
            AppError::DeleteBlocked(String::new()).error_code(),
            "DELETE_BLOCKED"
        );
        assert_eq!(
            AppError::ConstraintViolation(String::new()).error_code(),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_authentication_failed_is_uniform() {
        // The display string must not depend on which credential was wrong.
        assert_eq!(
            AppError::AuthenticationFailed.to_string(),
            "Invalid email or password"
        );
    }
}
