//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::refresh_token::{NewRefreshToken, RefreshToken};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user; returns the row with its assigned key
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by (lowercased) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Stamp a successful login
    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, user_id: UserId, phc_hash: &str) -> AuthResult<()>;
}

/// Refresh token repository trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a new refresh-token hash row
    async fn create(&self, token: &NewRefreshToken) -> AuthResult<RefreshToken>;

    /// All non-revoked rows with expiry after `now`, across users.
    ///
    /// Raw tokens are never stored, so there is nothing to index a
    /// point lookup on; the caller verifies the presented token against
    /// each returned hash.
    async fn find_active(&self, now: DateTime<Utc>) -> AuthResult<Vec<RefreshToken>>;

    /// Revoke every token of one user; returns the number revoked
    async fn revoke_all_for_user(&self, user_id: UserId) -> AuthResult<u64>;
}

/// Per-course enrollment summary for the profile endpoint
#[derive(Debug, Clone)]
pub struct EnrollmentSummary {
    pub enrollment_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub course_id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

/// Overall watch statistics for the profile endpoint
#[derive(Debug, Clone, Default)]
pub struct ProgressSummary {
    pub total_videos: i64,
    pub completed_videos: i64,
    pub total_duration_seconds: i64,
    pub watched_duration_seconds: i64,
}

/// Read-side queries the profile endpoint needs from the course domain.
///
/// Kept as a narrow trait here so the auth crate does not depend on the
/// academy crate; the Postgres repository implements it with its own
/// joins over the course tables.
#[trait_variant::make(ProfileReadRepository: Send)]
pub trait LocalProfileReadRepository {
    /// Active (access-granting) enrollments of a user
    async fn enrollments_for(&self, user_id: UserId) -> AuthResult<Vec<EnrollmentSummary>>;

    /// Watch totals across all of a user's enrolled, ready videos
    async fn progress_summary(&self, user_id: UserId) -> AuthResult<ProgressSummary>;
}
