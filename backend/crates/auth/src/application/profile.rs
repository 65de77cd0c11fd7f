//! Profile Use Case
//!
//! Assembles the `/auth/me` payload: the account itself, its active
//! enrollments, and overall watch statistics.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::{EnrollmentSummary, ProfileReadRepository, ProgressSummary};
use crate::error::AuthResult;

/// Profile output
pub struct ProfileOutput {
    pub enrollments: Vec<EnrollmentSummary>,
    pub progress: ProgressSummary,
}

/// Profile use case
pub struct ProfileUseCase<P>
where
    P: ProfileReadRepository,
{
    profile_repo: Arc<P>,
}

impl<P> ProfileUseCase<P>
where
    P: ProfileReadRepository,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    pub async fn execute(&self, user: &User) -> AuthResult<ProfileOutput> {
        let enrollments = self.profile_repo.enrollments_for(user.user_id).await?;
        let progress = self.profile_repo.progress_summary(user.user_id).await?;

        Ok(ProfileOutput {
            enrollments,
            progress,
        })
    }
}
