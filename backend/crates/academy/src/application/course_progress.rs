//! Course Progress Use Case
//!
//! Detailed per-course progress: module rollups, every video the user
//! has touched, and the next incomplete video in hierarchy order.

use std::sync::Arc;

use auth::models::user_id::UserId;
use chrono::Utc;

use crate::domain::entity::enrollment::Enrollment;
use crate::domain::repository::{EnrollmentRepository, ProgressRepository};
use crate::domain::rollup::{self, CoursePart, Totals};
use crate::domain::value_object::ids::{CourseId, ModuleId};
use crate::error::{AcademyError, AcademyResult};

/// Rollup for one module, keyed for display
pub struct ModuleRollup {
    pub module_id: ModuleId,
    pub module_number: i32,
    pub title: String,
    pub totals: Totals,
}

/// Course progress output
pub struct CourseProgressOutput {
    pub enrollment: Enrollment,
    pub modules: Vec<ModuleRollup>,
    /// Parts the user has a progress row for, hierarchy order
    pub videos: Vec<CoursePart>,
    /// First not-yet-completed ready part
    pub next_video: Option<CoursePart>,
}

/// Course progress use case
pub struct CourseProgressUseCase<E, P>
where
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    enrollments: Arc<E>,
    progress: Arc<P>,
}

impl<E, P> CourseProgressUseCase<E, P>
where
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub fn new(enrollments: Arc<E>, progress: Arc<P>) -> Self {
        Self {
            enrollments,
            progress,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<CourseProgressOutput> {
        let enrollment = self
            .enrollments
            .find_enrollment(user_id, course_id)
            .await?
            .filter(|e| e.payment_status.grants_access())
            .ok_or(AcademyError::NotEnrolled)?;

        if enrollment.is_expired(Utc::now()) {
            return Err(AcademyError::EnrollmentExpired);
        }

        let parts = self
            .progress
            .course_parts_with_progress(course_id, user_id)
            .await?;

        let modules = rollup::module_totals(&parts)
            .into_iter()
            .map(|(module_id, totals)| {
                // The slice is hierarchy-ordered, so the first part of
                // the group carries the module's display fields
                let first = parts
                    .iter()
                    .find(|p| p.module_id == module_id)
                    .expect("group key came from this slice");
                ModuleRollup {
                    module_id,
                    module_number: first.module_number,
                    title: first.module_title.clone(),
                    totals,
                }
            })
            .collect();

        let videos: Vec<CoursePart> = parts
            .iter()
            .filter(|p| p.has_progress())
            .cloned()
            .collect();

        let next_video = rollup::next_incomplete(&parts).cloned();

        Ok(CourseProgressOutput {
            enrollment,
            modules,
            videos,
            next_video,
        })
    }
}
