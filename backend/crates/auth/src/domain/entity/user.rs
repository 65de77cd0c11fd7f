//! User Entity
//!
//! Core account entity. The surrogate key is assigned by the database,
//! so an unpersisted registration is represented by [`NewUser`] and the
//! repository returns the persisted [`User`].

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{display_name::DisplayName, email::Email, user_id::UserId};

/// Persisted user account
#[derive(Debug, Clone)]
pub struct User {
    /// Database-assigned surrogate key
    pub user_id: UserId,
    /// Unique, lowercased email
    pub email: Email,
    /// Display name
    pub name: DisplayName,
    /// Argon2id password hash
    pub password_hash: HashedPassword,
    /// Cleared by admin action; inactive accounts cannot authenticate
    pub is_active: bool,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account may authenticate
    pub fn can_login(&self) -> bool {
        self.is_active
    }
}

/// Registration data awaiting persistence
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: HashedPassword,
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn sample_user(is_active: bool) -> User {
        let now = Utc::now();
        User {
            user_id: UserId::from_i64(1),
            email: Email::new("user@example.com").unwrap(),
            name: DisplayName::new("Test User").unwrap(),
            password_hash: ClearTextPassword::new("Sup3rSecret".to_string())
                .unwrap()
                .hash()
                .unwrap(),
            is_active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_login_follows_active_flag() {
        assert!(sample_user(true).can_login());
        assert!(!sample_user(false).can_login());
    }
}
