//! List Courses Use Case
//!
//! Published-course catalog, with per-course enrollment flags when a
//! viewer is authenticated.

use std::sync::Arc;

use auth::models::user_id::UserId;

use crate::domain::repository::{CatalogRepository, CourseOverview, EnrollmentRepository};
use crate::error::AcademyResult;

/// List courses output
pub struct ListCoursesOutput {
    pub courses: Vec<(CourseOverview, bool)>,
}

/// List courses use case
pub struct ListCoursesUseCase<C, E>
where
    C: CatalogRepository,
    E: EnrollmentRepository,
{
    catalog: Arc<C>,
    enrollments: Arc<E>,
}

impl<C, E> ListCoursesUseCase<C, E>
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

    pub async fn execute(&self, viewer: Option<UserId>) -> AcademyResult<ListCoursesOutput> {
        let courses = self.catalog.list_published_courses().await?;

        let enrolled = match viewer {
            Some(user_id) => self.enrollments.enrolled_course_ids(user_id).await?,
            None => Vec::new(),
        };

        let courses = courses
            .into_iter()
            .map(|overview| {
                let is_enrolled = enrolled.contains(&overview.course.course_id);
                (overview, is_enrolled)
            })
            .collect();

        Ok(ListCoursesOutput { courses })
    }
}
