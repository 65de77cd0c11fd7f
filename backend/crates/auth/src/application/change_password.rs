//! Change Password Use Case
//!
//! Verifies the current password, applies the registration password
//! policy to the new one, and forces re-login everywhere by revoking
//! all refresh tokens.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::user::User;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<T>,
}

impl<U, T> ChangePasswordUseCase<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, refresh_repo: Arc<T>) -> Self {
        Self {
            user_repo,
            refresh_repo,
        }
    }

    pub async fn execute(&self, user: &User, input: ChangePasswordInput) -> AuthResult<()> {
        let presented = ClearTextPassword::for_verification(input.current_password)
            .map_err(|_| AuthError::WrongCurrentPassword)?;

        if !user.password_hash.verify(&presented) {
            return Err(AuthError::WrongCurrentPassword);
        }

        // Same composition policy as registration
        let new_password = ClearTextPassword::new(input.new_password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let new_hash = new_password.hash()?;

        self.user_repo
            .update_password_hash(user.user_id, new_hash.as_phc_string())
            .await?;

        // Force re-login on every device
        let revoked = self
            .refresh_repo
            .revoke_all_for_user(user.user_id)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            revoked_tokens = revoked,
            "Password changed"
        );

        Ok(())
    }
}
