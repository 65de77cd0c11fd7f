//! Register Use Case
//!
//! Creates a new user account and issues the first token pair.

use std::sync::Arc;

use platform::password::ClearTextPassword;
use platform::token::AccessTokenCodec;

use crate::application::config::AuthConfig;
use crate::application::tokens::{IssuedTokens, issue_tokens};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Register output
pub struct RegisterOutput {
    pub user: User,
    pub tokens: IssuedTokens,
}

/// Register use case
pub struct RegisterUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<T>,
    config: Arc<AuthConfig>,
    codec: Arc<AccessTokenCodec>,
}

impl<U, T> RegisterUseCase<U, T>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate email, password policy, and name
        let email =
            Email::new(input.email).map_err(|e| AuthError::Validation(e.message().to_string()))?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let name = DisplayName::new(input.name)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // Duplicate check is case-insensitive because Email lowercases
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password.hash()?;

        let user = self
            .user_repo
            .create(&NewUser {
                email,
                name,
                password_hash,
            })
            .await?;

        // Registration issues a fresh pair but intentionally leaves any
        // pre-existing tokens alone; only login revokes.
        let tokens = issue_tokens(
            self.refresh_repo.as_ref(),
            &self.codec,
            &self.config,
            user.user_id,
        )
        .await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User registered"
        );

        Ok(RegisterOutput { user, tokens })
    }
}
