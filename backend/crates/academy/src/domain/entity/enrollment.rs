//! Enrollment Entity

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    ids::{CourseId, EnrollmentId},
    payment_status::PaymentStatus,
};

/// Record granting one user access to one course's gated content
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub payment_status: PaymentStatus,
    pub enrolled_at: DateTime<Utc>,
    /// Optional access cutoff; `None` means no expiry
    pub expires_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// Whether the expiry cutoff has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|cutoff| cutoff < now)
    }

    /// The sole access rule: qualifying payment status and not expired
    pub fn grants_access(&self, now: DateTime<Utc>) -> bool {
        self.payment_status.grants_access() && !self.is_expired(now)
    }
}
