//! Token Pair Issuance
//!
//! Shared by registration and login: issues a stateless access token
//! and a persisted refresh token. The refresh token is an opaque
//! 256-bit random value; only its Argon2id hash reaches storage.

use chrono::{Duration, Utc};
use platform::crypto::random_token;
use platform::password::ClearTextPassword;
use platform::token::AccessTokenCodec;

use crate::application::config::AuthConfig;
use crate::domain::entity::refresh_token::NewRefreshToken;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Raw token pair handed to the client exactly once
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue an access + refresh pair for `user_id`
///
/// Does NOT revoke prior refresh tokens; revocation policy belongs to
/// the calling use case (login revokes, registration does not).
pub async fn issue_tokens<T>(
    refresh_repo: &T,
    codec: &AccessTokenCodec,
    config: &AuthConfig,
    user_id: UserId,
) -> AuthResult<IssuedTokens>
where
    T: RefreshTokenRepository,
{
    let now = Utc::now();

    let access_token = codec
        .issue(user_id.get(), now.timestamp(), config.access_ttl_secs())
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    let refresh_token = random_token(32);

    // The hash primitive requires a non-empty secret, which a 32-byte
    // random token always satisfies.
    let token_hash = ClearTextPassword::for_verification(refresh_token.clone())
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .hash()?
        .as_phc_string()
        .to_string();

    refresh_repo
        .create(&NewRefreshToken {
            user_id,
            token_hash,
            expires_at: now + Duration::seconds(config.refresh_ttl_secs()),
        })
        .await?;

    Ok(IssuedTokens {
        access_token,
        refresh_token,
    })
}
