//! Academy Error Types
//!
//! This module provides course/progress-specific error variants that
//! integrate with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Academy-specific result type alias
pub type AcademyResult<T> = Result<T, AcademyError>;

/// Academy-specific error variants
#[derive(Debug, Error)]
pub enum AcademyError {
    /// Unknown course slug, or an unpublished course hidden from the viewer
    #[error("Course not found")]
    CourseNotFound,

    /// Module does not exist or belongs to another course
    #[error("Module not found")]
    ModuleNotFound,

    /// Video part missing, outside the gated course, or not ready
    #[error("Video not found or not ready")]
    VideoNotFound,

    /// No progress row to reset
    #[error("Progress record not found")]
    ProgressNotFound,

    /// No qualifying enrollment for a gated course
    #[error("You are not enrolled in this course")]
    NotEnrolled,

    /// Enrollment exists but its expiry has passed
    #[error("Your enrollment has expired")]
    EnrollmentExpired,

    /// Video-level access check failed; deliberately does not reveal
    /// whether the video exists
    #[error("Not enrolled in this course or video not found")]
    VideoAccessDenied,

    /// Free self-enroll on a course the user already has
    #[error("Already enrolled in this course")]
    AlreadyEnrolled,

    /// Free self-enroll on a paid course
    #[error("This course requires payment. Please use the checkout process.")]
    PaymentRequired,

    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Bearer authentication failed; delegates to the auth taxonomy
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AcademyError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AcademyError::CourseNotFound
            | AcademyError::ModuleNotFound
            | AcademyError::VideoNotFound
            | AcademyError::ProgressNotFound => StatusCode::NOT_FOUND,
            AcademyError::NotEnrolled
            | AcademyError::EnrollmentExpired
            | AcademyError::VideoAccessDenied => StatusCode::FORBIDDEN,
            AcademyError::AlreadyEnrolled
            | AcademyError::PaymentRequired
            | AcademyError::Validation(_) => StatusCode::BAD_REQUEST,
            AcademyError::Auth(e) => e.status_code(),
            AcademyError::Database(_) | AcademyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AcademyError::CourseNotFound
            | AcademyError::ModuleNotFound
            | AcademyError::VideoNotFound
            | AcademyError::ProgressNotFound => ErrorKind::NotFound,
            AcademyError::NotEnrolled
            | AcademyError::EnrollmentExpired
            | AcademyError::VideoAccessDenied => ErrorKind::Forbidden,
            AcademyError::AlreadyEnrolled
            | AcademyError::PaymentRequired
            | AcademyError::Validation(_) => ErrorKind::BadRequest,
            AcademyError::Auth(e) => e.kind(),
            AcademyError::Database(_) | AcademyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AcademyError::Database(e) => {
                tracing::error!(error = %e, "Academy database error");
            }
            AcademyError::Internal(msg) => {
                tracing::error!(message = %msg, "Academy internal error");
            }
            AcademyError::NotEnrolled
            | AcademyError::EnrollmentExpired
            | AcademyError::VideoAccessDenied => {
                tracing::warn!(error = %self, "Gated content access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Academy error");
            }
        }
    }
}

impl IntoResponse for AcademyError {
    fn into_response(self) -> Response {
        match self {
            // The auth taxonomy logs and renders itself
            AcademyError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

impl From<AppError> for AcademyError {
    fn from(err: AppError) -> Self {
        AcademyError::Internal(err.to_string())
    }
}
