//! Login Use Case
//!
//! Authenticates a user and rotates their session: all prior refresh
//! tokens are revoked before the new pair is issued.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;
use platform::token::AccessTokenCodec;

use crate::application::config::AuthConfig;
use crate::application::tokens::{IssuedTokens, issue_tokens};
use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub tokens: IssuedTokens,
}

/// Login use case
pub struct LoginUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<T>,
    config: Arc<AuthConfig>,
    codec: Arc<AccessTokenCodec>,
}

impl<U, T> LoginUseCase<U, T>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // A malformed email cannot match an account; answer exactly as
        // for an unknown address so the two are indistinguishable.
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Deactivated accounts get a distinct, actionable answer
        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let presented = ClearTextPassword::for_verification(input.password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        if !user.password_hash.verify(&presented) {
            return Err(AuthError::InvalidCredentials);
        }

        self.user_repo.record_login(user.user_id, Utc::now()).await?;

        // Single-active-session policy: each login invalidates every
        // previously issued refresh token.
        let revoked = self
            .refresh_repo
            .revoke_all_for_user(user.user_id)
            .await?;

        let tokens = issue_tokens(
            self.refresh_repo.as_ref(),
            &self.codec,
            &self.config,
            user.user_id,
        )
        .await?;

        tracing::info!(
            user_id = %user.user_id,
            revoked_tokens = revoked,
            "User logged in"
        );

        Ok(LoginOutput { user, tokens })
    }
}
