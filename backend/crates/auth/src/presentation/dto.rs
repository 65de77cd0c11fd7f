//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::repository::{EnrollmentSummary, ProgressSummary};

// ============================================================================
// Register / Login
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.get(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
        }
    }
}

/// Register / login response: profile plus the raw token pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

// ============================================================================
// Refresh
// ============================================================================

/// Refresh request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

// ============================================================================
// Change Password
// ============================================================================

/// Change password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Profile (/auth/me)
// ============================================================================

/// Full profile view of the authenticated user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUserDto {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One enrollment row in the profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEnrollmentDto {
    pub enrollment_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub course_id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

impl From<EnrollmentSummary> for ProfileEnrollmentDto {
    fn from(e: EnrollmentSummary) -> Self {
        Self {
            enrollment_id: e.enrollment_id,
            enrolled_at: e.enrolled_at,
            expires_at: e.expires_at,
            course_id: e.course_id,
            slug: e.slug,
            title: e.title,
            description: e.description,
        }
    }
}

/// Overall watch statistics in the profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileProgressDto {
    pub total_videos: i64,
    pub completed_videos: i64,
    pub total_duration_seconds: i64,
    pub watched_duration_seconds: i64,
}

impl From<ProgressSummary> for ProfileProgressDto {
    fn from(p: ProgressSummary) -> Self {
        Self {
            total_videos: p.total_videos,
            completed_videos: p.completed_videos,
            total_duration_seconds: p.total_duration_seconds,
            watched_duration_seconds: p.watched_duration_seconds,
        }
    }
}

/// Profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: ProfileUserDto,
    pub enrollments: Vec<ProfileEnrollmentDto>,
    pub progress: ProfileProgressDto,
}
