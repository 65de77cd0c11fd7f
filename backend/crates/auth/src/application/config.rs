//! Application Configuration
//!
//! Configuration for the Auth application layer. Secrets are validated
//! at construction so a misconfigured deployment fails at startup, not
//! on the first login.

use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use platform::token::AccessTokenCodec;

/// Minimum JWT secret length in bytes (HS256 key material)
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for access-token signing
    jwt_secret: Vec<u8>,
    /// Access token TTL (24 hours)
    pub access_ttl: Duration,
    /// Refresh token TTL (30 days)
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Create a config with validated secret and default TTLs
    pub fn new(jwt_secret: Vec<u8>) -> AppResult<Self> {
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::internal(format!(
                "JWT secret must be at least {} bytes",
                MIN_JWT_SECRET_LEN
            )));
        }

        Ok(Self {
            jwt_secret,
            access_ttl: Duration::from_secs(24 * 3600),
            refresh_ttl: Duration::from_secs(30 * 24 * 3600),
        })
    }

    /// Override the access token TTL
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Override the refresh token TTL
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Create config with a random secret (for development)
    pub fn development() -> Self {
        Self::new(platform::crypto::random_bytes(MIN_JWT_SECRET_LEN))
            .expect("random secret satisfies the length requirement")
    }

    /// Build the token codec for this secret
    pub fn codec(&self) -> AccessTokenCodec {
        AccessTokenCodec::new(&self.jwt_secret)
    }

    /// Access token TTL in whole seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.as_secs() as i64
    }

    /// Refresh token TTL in whole seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        assert!(AuthConfig::new(vec![0u8; 16]).is_err());
        assert!(AuthConfig::new(vec![0u8; 32]).is_ok());
    }

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::development();
        assert_eq!(config.access_ttl_secs(), 24 * 3600);
        assert_eq!(config.refresh_ttl_secs(), 30 * 24 * 3600);
    }

    #[test]
    fn test_ttl_overrides() {
        let config = AuthConfig::development()
            .with_access_ttl(Duration::from_secs(60))
            .with_refresh_ttl(Duration::from_secs(120));
        assert_eq!(config.access_ttl_secs(), 60);
        assert_eq!(config.refresh_ttl_secs(), 120);
    }
}
