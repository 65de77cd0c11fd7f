//! Auth Middleware
//!
//! Bearer-token authentication helpers for protected routes. The user
//! row is re-fetched on every call - an access token alone never proves
//! the account still exists or is still active.

use axum::http::{HeaderMap, header};
use platform::token::{AccessTokenCodec, TokenError};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Extract the raw token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;

    match header_value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(AuthError::MalformedAuthHeader),
    }
}

/// Authenticate a request and resolve the current user
///
/// Fails with distinct errors for a missing/malformed header, an
/// expired token, a tampered token, a vanished user, and a deactivated
/// account.
pub async fn authenticate<R>(
    repo: &R,
    codec: &AccessTokenCodec,
    headers: &HeaderMap,
) -> AuthResult<User>
where
    R: UserRepository,
{
    let token = extract_bearer_token(headers)?;

    let claims = codec.verify(token).map_err(|e| match e {
        TokenError::Expired => AuthError::TokenExpired,
        TokenError::Invalid => AuthError::TokenInvalid,
    })?;

    let user = repo
        .find_by_id(UserId::from_i64(claims.sub))
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !user.can_login() {
        return Err(AuthError::AccountDisabled);
    }

    Ok(user)
}

/// Authentication that never fails
///
/// Absent, malformed, expired, or otherwise unusable credentials simply
/// yield an anonymous context. Used by listings that show extra detail
/// to logged-in viewers.
pub async fn authenticate_optional<R>(
    repo: &R,
    codec: &AccessTokenCodec,
    headers: &HeaderMap,
) -> Option<User>
where
    R: UserRepository,
{
    authenticate(repo, codec, headers).await.ok()
}
