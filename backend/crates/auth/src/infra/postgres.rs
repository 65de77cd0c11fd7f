//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use platform::password::HashedPassword;

use crate::domain::entity::refresh_token::{NewRefreshToken, RefreshToken, RefreshTokenId};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{
    EnrollmentSummary, ProfileReadRepository, ProgressSummary, RefreshTokenRepository,
    UserRepository,
};
use crate::domain::value_object::{display_name::DisplayName, email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete refresh-token rows that can never validate again
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query(
            "DELETE FROM refresh_tokens WHERE revoked = TRUE OR expires_at < $1",
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up stale refresh tokens");

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

const USER_COLUMNS: &str = "id, email, name, password_hash, is_active, \
                            last_login_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Corrupt password hash: {}", e)))?;

        Ok(User {
            user_id: UserId::from_i64(self.id),
            email: Email::from_db(self.email),
            name: DisplayName::from_db(self.name),
            password_hash,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: i64,
    user_id: i64,
    token_hash: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
    created_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    fn into_token(self) -> RefreshToken {
        RefreshToken {
            token_id: RefreshTokenId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            token_hash: self.token_hash,
            expires_at: self.expires_at,
            revoked: self.revoked,
            created_at: self.created_at,
        }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, password_hash, name) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.name.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_user()
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query("UPDATE users SET last_login_at = $2, updated_at = $2 WHERE id = $1")
            .bind(user_id.get())
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_password_hash(&self, user_id: UserId, phc_hash: &str) -> AuthResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id.get())
            .bind(phc_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn create(&self, token: &NewRefreshToken) -> AuthResult<RefreshToken> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, token_hash, expires_at, revoked, created_at",
        )
        .bind(token.user_id.get())
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_token())
    }

    async fn find_active(&self, now: DateTime<Utc>) -> AuthResult<Vec<RefreshToken>> {
        let rows = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT id, user_id, token_hash, expires_at, revoked, created_at \
             FROM refresh_tokens \
             WHERE revoked = FALSE AND expires_at > $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RefreshTokenRow::into_token).collect())
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> AuthResult<u64> {
        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE \
             WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id.get())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(revoked)
    }
}

// ============================================================================
// Profile Read Repository Implementation
// ============================================================================

#[derive(sqlx::FromRow)]
struct EnrollmentSummaryRow {
    enrollment_id: i64,
    enrolled_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    course_id: i64,
    slug: String,
    title: String,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ProgressSummaryRow {
    total_videos: i64,
    completed_videos: i64,
    total_duration_seconds: i64,
    watched_duration_seconds: i64,
}

impl ProfileReadRepository for PgAuthRepository {
    async fn enrollments_for(&self, user_id: UserId) -> AuthResult<Vec<EnrollmentSummary>> {
        let rows = sqlx::query_as::<_, EnrollmentSummaryRow>(
            "SELECT \
                 e.id AS enrollment_id, \
                 e.enrolled_at, \
                 e.expires_at, \
                 c.id AS course_id, \
                 c.slug, \
                 c.title, \
                 c.description \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.user_id = $1 AND e.payment_status IN ('completed', 'free') \
             ORDER BY e.enrolled_at",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| EnrollmentSummary {
                enrollment_id: r.enrollment_id,
                enrolled_at: r.enrolled_at,
                expires_at: r.expires_at,
                course_id: r.course_id,
                slug: r.slug,
                title: r.title,
                description: r.description,
            })
            .collect())
    }

    async fn progress_summary(&self, user_id: UserId) -> AuthResult<ProgressSummary> {
        let row = sqlx::query_as::<_, ProgressSummaryRow>(
            "SELECT \
                 COUNT(DISTINCT vp.id) AS total_videos, \
                 COUNT(DISTINCT vp.id) FILTER (WHERE up.completed) AS completed_videos, \
                 COALESCE(SUM(vp.duration_seconds), 0)::BIGINT AS total_duration_seconds, \
                 COALESCE(SUM(CASE WHEN up.completed THEN vp.duration_seconds \
                                   ELSE COALESCE(up.progress_seconds, 0) END), 0)::BIGINT \
                     AS watched_duration_seconds \
             FROM enrollments e \
             JOIN modules m ON m.course_id = e.course_id \
             JOIN lessons l ON l.module_id = m.id \
             JOIN video_parts vp ON vp.lesson_id = l.id AND vp.status = 'ready' \
             LEFT JOIN user_progress up \
                 ON up.video_part_id = vp.id AND up.user_id = e.user_id \
             WHERE e.user_id = $1 AND e.payment_status IN ('completed', 'free')",
        )
        .bind(user_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(ProgressSummary {
            total_videos: row.total_videos,
            completed_videos: row.completed_videos,
            total_duration_seconds: row.total_duration_seconds,
            watched_duration_seconds: row.watched_duration_seconds,
        })
    }
}
