//! Access Token Issuing and Verification
//!
//! Stateless JWT access tokens (HS256). Refresh tokens are NOT JWTs:
//! they are opaque random values whose hashes live in storage, handled
//! by the auth domain. Verification distinguishes an expired token from
//! a malformed/tampered one so clients can silently refresh on expiry
//! and hard-logout on tampering.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user's surrogate key
    pub sub: i64,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Token verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token was valid once but its expiry has passed
    #[error("Token has expired")]
    Expired,

    /// Token is malformed, tampered with, or signed with another key
    #[error("Invalid token")]
    Invalid,
}

/// Issues and verifies access tokens with a shared HMAC secret
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AccessTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `user_id` valid for `ttl_secs` from `issued_at`
    ///
    /// `issued_at` is passed in (Unix seconds) rather than read from the
    /// clock here, so issuing is deterministic under test.
    pub fn issue(&self, user_id: i64, issued_at: i64, ttl_secs: i64) -> Result<String, TokenError> {
        let claims = AccessClaims {
            sub: user_id,
            iat: issued_at,
            exp: issued_at + ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl std::fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = AccessTokenCodec::new(b"test-secret-test-secret-test-sec");
        let issued_at = now();

        let token = codec.issue(42, issued_at, 3600).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iat, issued_at);
        assert_eq!(claims.exp, issued_at + 3600);
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let codec = AccessTokenCodec::new(b"test-secret-test-secret-test-sec");

        // Issued two hours ago with a one-hour TTL
        let token = codec.issue(42, now() - 7200, 3600).unwrap();
        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let codec = AccessTokenCodec::new(b"test-secret-test-secret-test-sec");
        let token = codec.issue(42, now(), 3600).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert_eq!(codec.verify(&tampered).unwrap_err(), TokenError::Invalid);

        assert_eq!(
            codec.verify("not-a-jwt").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid_not_expired() {
        let codec = AccessTokenCodec::new(b"test-secret-test-secret-test-sec");
        let other = AccessTokenCodec::new(b"another-secret-another-secret-xx");

        let token = codec.issue(42, now() - 7200, 3600).unwrap();
        // Signature check fails before expiry is considered
        assert_eq!(other.verify(&token).unwrap_err(), TokenError::Invalid);
    }
}
