//! Payment Status Value Object

use serde::{Deserialize, Serialize};

/// Payment state of an enrollment
///
/// Only `Completed` and `Free` grant access to gated content; the
/// other states exist so checkout flows can park rows without granting
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Free,
    Pending,
    Refunded,
}

impl PaymentStatus {
    /// Whether this state grants access to gated content
    pub fn grants_access(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Free)
    }

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Free => "free",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Parse a storage value; unknown states never grant access, so
    /// they collapse to `Pending` rather than failing the row load
    pub fn from_db(s: &str) -> Self {
        match s {
            "completed" => PaymentStatus::Completed,
            "free" => PaymentStatus::Free,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_grants() {
        assert!(PaymentStatus::Completed.grants_access());
        assert!(PaymentStatus::Free.grants_access());
        assert!(!PaymentStatus::Pending.grants_access());
        assert!(!PaymentStatus::Refunded.grants_access());
    }

    #[test]
    fn test_db_roundtrip() {
        for status in [
            PaymentStatus::Completed,
            PaymentStatus::Free,
            PaymentStatus::Pending,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::from_db(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_is_not_access_granting() {
        assert!(!PaymentStatus::from_db("chargeback").grants_access());
    }
}
