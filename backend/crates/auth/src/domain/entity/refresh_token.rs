//! Refresh Token Entity
//!
//! Server-side record of a long-lived refresh token. Only the Argon2id
//! hash of the raw token is stored; lookups therefore scan all active
//! rows and verify the presented token against each hash.

use chrono::{DateTime, Utc};

use crate::domain::value_object::user_id::UserId;

/// Marker for typed refresh-token IDs
pub struct RefreshTokenMarker;
pub type RefreshTokenId = kernel::id::Id<RefreshTokenMarker>;

/// Persisted refresh-token row
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token_id: RefreshTokenId,
    pub user_id: UserId,
    /// PHC-format hash of the raw token
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// A row is active when it is neither revoked nor past expiry
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// Refresh-token data awaiting persistence
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(revoked: bool, expires_in: Duration) -> RefreshToken {
        let now = Utc::now();
        RefreshToken {
            token_id: RefreshTokenId::from_i64(1),
            user_id: UserId::from_i64(1),
            token_hash: "$argon2id$fake".to_string(),
            expires_at: now + expires_in,
            revoked,
            created_at: now,
        }
    }

    #[test]
    fn test_is_active() {
        let now = Utc::now();
        assert!(row(false, Duration::days(30)).is_active(now));
        assert!(!row(true, Duration::days(30)).is_active(now));
        assert!(!row(false, Duration::days(-1)).is_active(now));
    }
}
