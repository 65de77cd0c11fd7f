//! Course Detail Use Case
//!
//! A single course with its modules. Unpublished courses exist only
//! for their enrolled users; everyone else sees a 404 rather than a
//! hint that the course exists.

use std::sync::Arc;

use auth::models::user_id::UserId;

use crate::domain::entity::course::Course;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::repository::{
    CatalogRepository, EnrollmentRepository, ModuleOverview, ProgressRepository,
};
use crate::domain::rollup::{self, Totals};
use crate::error::{AcademyError, AcademyResult};

/// Course detail output
pub struct CourseDetailOutput {
    pub course: Course,
    pub modules: Vec<ModuleOverview>,
    pub enrollment: Option<Enrollment>,
    /// Present when the viewer holds a qualifying enrollment
    pub progress: Option<Totals>,
}

/// Course detail use case
pub struct CourseDetailUseCase<C, E, P>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    catalog: Arc<C>,
    enrollments: Arc<E>,
    progress: Arc<P>,
}

impl<C, E, P> CourseDetailUseCase<C, E, P>
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
        slug: &str,
        viewer: Option<UserId>,
    ) -> AcademyResult<CourseDetailOutput> {
        let course = self
            .catalog
            .find_course_by_slug(slug)
            .await?
            .ok_or(AcademyError::CourseNotFound)?;

        // Resolve the viewer's enrollment once; it drives both the
        // unpublished-visibility rule and the progress block
        let enrollment = match viewer {
            Some(user_id) => self
                .enrollments
                .find_enrollment(user_id, course.course_id)
                .await?
                .filter(|e| e.payment_status.grants_access()),
            None => None,
        };

        if !course.is_published && enrollment.is_none() {
            return Err(AcademyError::CourseNotFound);
        }

        let modules = self.catalog.modules_for_course(course.course_id).await?;

        let progress = match (&enrollment, viewer) {
            (Some(_), Some(user_id)) => {
                let parts = self
                    .progress
                    .course_parts_with_progress(course.course_id, user_id)
                    .await?;
                Some(rollup::totals(&parts))
            }
            _ => None,
        };

        Ok(CourseDetailOutput {
            course,
            modules,
            enrollment,
            progress,
        })
    }
}
