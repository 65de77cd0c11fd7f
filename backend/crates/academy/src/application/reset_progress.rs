//! Reset Progress Use Case
//!
//! Explicitly rewinds one video: zeroes the watch position and clears
//! the sticky completion flag. The row itself is kept.

use std::sync::Arc;

use auth::models::user_id::UserId;
use chrono::Utc;

use crate::application::gate::ensure_video_access;
use crate::domain::repository::{CatalogRepository, EnrollmentRepository, ProgressRepository};
use crate::domain::value_object::ids::VideoPartId;
use crate::error::{AcademyError, AcademyResult};

/// Reset progress use case
pub struct ResetProgressUseCase<C, E, P>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    catalog: Arc<C>,
    enrollments: Arc<E>,
    progress: Arc<P>,
}

impl<C, E, P> ResetProgressUseCase<C, E, P>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub fn new(catalog: Arc<C>, enrollments: Arc<E>, progress: Arc<P>) -> Self {
        Self {
            catalog,
            enrollments,
            progress,
        }
    }

    pub async fn execute(&self, user_id: UserId, video_part_id: VideoPartId) -> AcademyResult<()> {
        // The reset is only reachable under a qualifying enrollment;
        // without one the row is reported missing rather than forbidden
        ensure_video_access(
            self.catalog.as_ref(),
            self.enrollments.as_ref(),
            user_id,
            video_part_id,
        )
        .await
        .map_err(|e| match e {
            AcademyError::VideoAccessDenied => AcademyError::ProgressNotFound,
            other => other,
        })?;

        let reset = self
            .progress
            .reset_progress(user_id, video_part_id, Utc::now())
            .await?;

        if !reset {
            return Err(AcademyError::ProgressNotFound);
        }

        tracing::debug!(
            user_id = %user_id,
            video_part_id = %video_part_id,
            "Progress reset"
        );

        Ok(())
    }
}
