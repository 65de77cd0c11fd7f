//! Report Progress Use Case
//!
//! Periodic watch-position writes from the player. The stored value is
//! capped at the video's duration, and a row already marked completed
//! is left untouched (sticky completion) without erroring.

use std::sync::Arc;

use auth::models::user_id::UserId;
use chrono::Utc;

use crate::application::gate::ensure_video_access;
use crate::domain::entity::progress::{UserProgress, cap_progress};
use crate::domain::repository::{CatalogRepository, EnrollmentRepository, ProgressRepository};
use crate::domain::rollup::percent;
use crate::domain::value_object::ids::VideoPartId;
use crate::error::{AcademyError, AcademyResult};

/// Report progress output: the state the player should display
pub struct ReportProgressOutput {
    pub video_part_id: VideoPartId,
    pub progress_seconds: i64,
    pub duration_seconds: i64,
    pub percent_complete: i64,
}

/// Report progress use case
pub struct ReportProgressUseCase<C, E, P>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    catalog: Arc<C>,
    enrollments: Arc<E>,
    progress: Arc<P>,
}

impl<C, E, P> ReportProgressUseCase<C, E, P>
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

    pub async fn execute(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        progress_seconds: f64,
    ) -> AcademyResult<ReportProgressOutput> {
        if !progress_seconds.is_finite() || progress_seconds < 0.0 {
            return Err(AcademyError::Validation(
                "progressSeconds must be a non-negative number".to_string(),
            ));
        }

        let (part, _course_id) = ensure_video_access(
            self.catalog.as_ref(),
            self.enrollments.as_ref(),
            user_id,
            video_part_id,
        )
        .await?;

        let capped = cap_progress(progress_seconds.round() as i64, part.duration_seconds);

        let existing = self.progress.find_progress(user_id, video_part_id).await?;

        let stored: UserProgress = match existing {
            // Sticky completion: the write is silently dropped
            Some(row) if row.completed => row,
            _ => {
                self.progress
                    .upsert_progress(user_id, video_part_id, capped, Utc::now())
                    .await?
            }
        };

        Ok(ReportProgressOutput {
            video_part_id,
            progress_seconds: stored.progress_seconds,
            duration_seconds: part.duration_seconds,
            percent_complete: percent(stored.progress_seconds, part.duration_seconds),
        })
    }
}
