//! Logout Use Case
//!
//! Revokes every refresh token of the authenticated user. The current
//! access token stays valid until its own expiry; it is stateless by
//! design and simply cannot be refreshed afterwards.

use std::sync::Arc;

use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<T>
where
    T: RefreshTokenRepository,
{
    refresh_repo: Arc<T>,
}

impl<T> LogoutUseCase<T>
where
    T: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<T>) -> Self {
        Self { refresh_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<u64> {
        let revoked = self.refresh_repo.revoke_all_for_user(user_id).await?;

        tracing::info!(user_id = %user_id, revoked_tokens = revoked, "User logged out");

        Ok(revoked)
    }
}
