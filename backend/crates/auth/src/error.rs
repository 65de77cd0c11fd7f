//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input (email format, password policy, name length)
    #[error("{0}")]
    Validation(String),

    /// Email already registered (case-insensitive)
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Unknown email or wrong password - deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but has been deactivated by an admin
    #[error("Account is deactivated. Please contact support.")]
    AccountDisabled,

    /// No Authorization header on a protected route
    #[error("No authorization header provided")]
    MissingAuthHeader,

    /// Authorization header is not `Bearer <token>`
    #[error("Invalid authorization header format. Use: Bearer <token>")]
    MalformedAuthHeader,

    /// Access token was valid but has expired (client should refresh)
    #[error("Token has expired")]
    TokenExpired,

    /// Access token is malformed or tampered (client should log out)
    #[error("Invalid token")]
    TokenInvalid,

    /// Token subject no longer resolves to a user row
    #[error("User not found")]
    UserNotFound,

    /// Presented refresh token matches no active stored hash
    #[error("Invalid or expired refresh token")]
    RefreshTokenInvalid,

    /// Password change: current password did not verify
    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::MissingAuthHeader
            | AuthError::MalformedAuthHeader
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::UserNotFound
            | AuthError::RefreshTokenInvalid
            | AuthError::WrongCurrentPassword => StatusCode::UNAUTHORIZED,
            AuthError::AccountDisabled => StatusCode::FORBIDDEN,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingAuthHeader
            | AuthError::MalformedAuthHeader
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::UserNotFound
            | AuthError::RefreshTokenInvalid
            | AuthError::WrongCurrentPassword => ErrorKind::Unauthorized,
            AuthError::AccountDisabled => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountDisabled => {
                tracing::warn!("Request on deactivated account");
            }
            AuthError::RefreshTokenInvalid => {
                tracing::warn!("Refresh attempt with unknown or expired token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
