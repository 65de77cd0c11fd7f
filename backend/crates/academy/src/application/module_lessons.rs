//! Module Lessons Use Case
//!
//! Lessons of one module with their ready video parts and the viewer's
//! per-video progress. Runs behind the enrollment gate.

use std::sync::Arc;

use auth::models::user_id::UserId;

use crate::application::gate::CourseAccess;
use crate::domain::entity::lesson::Lesson;
use crate::domain::entity::module::CourseModule;
use crate::domain::repository::{CatalogRepository, ProgressRepository};
use crate::domain::rollup::{self, CoursePart, Totals};
use crate::domain::value_object::ids::ModuleId;
use crate::error::{AcademyError, AcademyResult};

/// One lesson with its ready parts and rollup
pub struct LessonWithParts {
    pub lesson: Lesson,
    pub parts: Vec<CoursePart>,
    pub totals: Totals,
}

/// Module lessons output
pub struct ModuleLessonsOutput {
    pub module: CourseModule,
    pub lessons: Vec<LessonWithParts>,
}

/// Module lessons use case
pub struct ModuleLessonsUseCase<C, P>
where
    C: CatalogRepository,
    P: ProgressRepository,
{
    catalog: Arc<C>,
    progress: Arc<P>,
}

impl<C, P> ModuleLessonsUseCase<C, P>
where
    C: CatalogRepository,
    P: ProgressRepository,
{
    pub fn new(catalog: Arc<C>, progress: Arc<P>) -> Self {
        Self { catalog, progress }
    }

    pub async fn execute(
        &self,
        access: &CourseAccess,
        module_id: ModuleId,
        user_id: UserId,
    ) -> AcademyResult<ModuleLessonsOutput> {
        // The module must belong to the gated course
        let module = self
            .catalog
            .find_module_in_course(module_id, access.course.course_id)
            .await?
            .ok_or(AcademyError::ModuleNotFound)?;

        let lessons = self.catalog.lessons_for_module(module_id).await?;
        let parts = self
            .progress
            .module_parts_with_progress(module_id, user_id)
            .await?;

        let lessons = lessons
            .into_iter()
            .map(|lesson| {
                let lesson_parts: Vec<CoursePart> = parts
                    .iter()
                    .filter(|p| p.lesson_id == lesson.lesson_id)
                    .cloned()
                    .collect();
                let totals = rollup::totals(&lesson_parts);
                LessonWithParts {
                    lesson,
                    parts: lesson_parts,
                    totals,
                }
            })
            .collect();

        Ok(ModuleLessonsOutput { module, lessons })
    }
}
