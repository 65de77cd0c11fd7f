//! Enroll Use Case
//!
//! Free-course self-enrollment. Paid courses go through an external
//! checkout that lands `completed` enrollments out of band.

use std::sync::Arc;

use auth::models::user_id::UserId;

use crate::domain::entity::course::Course;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::repository::{CatalogRepository, EnrollmentRepository};
use crate::error::{AcademyError, AcademyResult};

/// Enroll output
pub struct EnrollOutput {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// Enroll use case
pub struct EnrollUseCase<C, E>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
{
    catalog: Arc<C>,
    enrollments: Arc<E>,
}

impl<C, E> EnrollUseCase<C, E>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
{
    pub fn new(catalog: Arc<C>, enrollments: Arc<E>) -> Self {
        Self {
            catalog,
            enrollments,
        }
    }

    pub async fn execute(&self, user_id: UserId, slug: &str) -> AcademyResult<EnrollOutput> {
        // Unpublished courses cannot be self-enrolled into
        let course = self
            .catalog
            .find_course_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or(AcademyError::CourseNotFound)?;

        // Any existing row blocks re-enrollment, even a pending one
        if self
            .enrollments
            .find_enrollment(user_id, course.course_id)
            .await?
            .is_some()
        {
            return Err(AcademyError::AlreadyEnrolled);
        }

        if !course.is_free() {
            return Err(AcademyError::PaymentRequired);
        }

        let enrollment = self
            .enrollments
            .create_free_enrollment(user_id, course.course_id)
            .await?;

        tracing::info!(
            user_id = %user_id,
            course = %course.slug,
            "User enrolled in free course"
        );

        Ok(EnrollOutput { enrollment, course })
    }
}
