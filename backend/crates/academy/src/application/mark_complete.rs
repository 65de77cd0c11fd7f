//! Mark Complete Use Case
//!
//! Marks one video part watched to the end and reports whether that
//! also finishes the containing lesson and the whole course. The
//! lesson/course flags are derived from current rows on every call,
//! never stored.

use std::sync::Arc;

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::application::gate::ensure_video_access;
use crate::domain::repository::{CatalogRepository, EnrollmentRepository, ProgressRepository};
use crate::domain::rollup;
use crate::domain::value_object::ids::VideoPartId;
use crate::error::AcademyResult;

/// Mark complete output
pub struct MarkCompleteOutput {
    pub video_part_id: VideoPartId,
    pub completed_at: Option<DateTime<Utc>>,
    /// Every ready part of the containing lesson is now completed
    pub lesson_complete: bool,
    /// Every ready part of the course is now completed
    pub course_complete: bool,
}

/// Mark complete use case
pub struct MarkCompleteUseCase<C, E, P>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    catalog: Arc<C>,
    enrollments: Arc<E>,
    progress: Arc<P>,
}

impl<C, E, P> MarkCompleteUseCase<C, E, P>
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
    ) -> AcademyResult<MarkCompleteOutput> {
        let (part, course_id) = ensure_video_access(
            self.catalog.as_ref(),
            self.enrollments.as_ref(),
            user_id,
            video_part_id,
        )
        .await?;

        let stored = self
            .progress
            .mark_complete(user_id, video_part_id, part.duration_seconds, Utc::now())
            .await?;

        // Recompute both flags from what is ready right now; parts
        // published after an earlier "100%" count again by design
        let parts = self
            .progress
            .course_parts_with_progress(course_id, user_id)
            .await?;

        let lesson_complete = rollup::lesson_complete(&parts, part.lesson_id);
        let course_complete = rollup::course_complete(&parts);

        tracing::debug!(
            user_id = %user_id,
            video_part_id = %video_part_id,
            lesson_complete,
            course_complete,
            "Video marked complete"
        );

        Ok(MarkCompleteOutput {
            video_part_id,
            completed_at: stored.completed_at,
            lesson_complete,
            course_complete,
        })
    }
}
