//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a new access token. The refresh
//! token itself is not rotated on this path.

use std::sync::Arc;

use chrono::Utc;
use platform::password::{ClearTextPassword, HashedPassword};
use platform::token::AccessTokenCodec;

use crate::application::config::AuthConfig;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub access_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<T>,
    config: Arc<AuthConfig>,
    codec: Arc<AccessTokenCodec>,
}

impl<U, T> RefreshUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        refresh_repo: Arc<T>,
        config: Arc<AuthConfig>,
        codec: Arc<AccessTokenCodec>,
    ) -> Self {
        Self {
            user_repo,
            refresh_repo,
            config,
            codec,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        if refresh_token.is_empty() {
            return Err(AuthError::Validation(
                "Refresh token is required".to_string(),
            ));
        }

        let presented = ClearTextPassword::for_verification(refresh_token.to_string())
            .map_err(|_| AuthError::RefreshTokenInvalid)?;

        // Only hashes are stored, so there is no column to look the raw
        // token up by: scan the active rows and verify against each.
        let now = Utc::now();
        let candidates = self.refresh_repo.find_active(now).await?;

        let matched = candidates.into_iter().find(|row| {
            HashedPassword::from_phc_string(&row.token_hash)
                .map(|hash| hash.verify(&presented))
                .unwrap_or(false)
        });

        let row = matched.ok_or(AuthError::RefreshTokenInvalid)?;

        let user = self
            .user_repo
            .find_by_id(row.user_id)
            .await?
            .filter(|u| u.can_login())
            .ok_or(AuthError::RefreshTokenInvalid)?;

        // New access token only; the stored refresh row stays as-is
        let access_token = self
            .codec
            .issue(
                user.user_id.get(),
                now.timestamp(),
                self.config.access_ttl_secs(),
            )
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::debug!(user_id = %user.user_id, "Access token refreshed");

        Ok(RefreshOutput { access_token })
    }
}
