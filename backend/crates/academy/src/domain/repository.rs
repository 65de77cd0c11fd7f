//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::entity::course::Course;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::entity::lesson::Lesson;
use crate::domain::entity::module::CourseModule;
use crate::domain::entity::progress::UserProgress;
use crate::domain::entity::video_part::VideoPart;
use crate::domain::rollup::CoursePart;
use crate::domain::value_object::ids::{CourseId, ModuleId, VideoPartId};
use crate::error::AcademyResult;

/// A course with catalog-level counts for listings
#[derive(Debug, Clone)]
pub struct CourseOverview {
    pub course: Course,
    pub module_count: i64,
    pub lesson_count: i64,
    /// Sum of lesson durations (catalog display, not progress math)
    pub total_duration_seconds: i64,
}

/// A module with catalog-level counts for the course page
#[derive(Debug, Clone)]
pub struct ModuleOverview {
    pub module: CourseModule,
    pub lesson_count: i64,
    pub total_duration_seconds: i64,
}

/// A course the user is enrolled in, for the progress overview
#[derive(Debug, Clone)]
pub struct EnrolledCourse {
    pub course_id: CourseId,
    pub slug: String,
    pub title: String,
    pub enrolled_at: DateTime<Utc>,
}

/// A recently watched video with its hierarchy context
#[derive(Debug, Clone)]
pub struct RecentActivity {
    pub progress_id: i64,
    pub progress_seconds: i64,
    pub completed: bool,
    pub last_watched_at: Option<DateTime<Utc>>,
    pub video_part_id: i64,
    pub part_number: i32,
    pub video_title: Option<String>,
    pub duration_seconds: i64,
    pub lesson_id: i64,
    pub lesson_number: i32,
    pub lesson_title: String,
    pub module_id: i64,
    pub module_number: i32,
    pub module_title: String,
    pub course_id: i64,
    pub course_slug: String,
    pub course_title: String,
}

/// Catalog repository trait
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    /// Published courses with counts, newest first
    async fn list_published_courses(&self) -> AcademyResult<Vec<CourseOverview>>;

    /// Find course by slug (published or not)
    async fn find_course_by_slug(&self, slug: &str) -> AcademyResult<Option<Course>>;

    /// Find course by ID
    async fn find_course_by_id(&self, course_id: CourseId) -> AcademyResult<Option<Course>>;

    /// Modules of a course with counts, in display order
    async fn modules_for_course(&self, course_id: CourseId) -> AcademyResult<Vec<ModuleOverview>>;

    /// A module, only if it belongs to the given course
    async fn find_module_in_course(
        &self,
        module_id: ModuleId,
        course_id: CourseId,
    ) -> AcademyResult<Option<CourseModule>>;

    /// Lessons of a module, in display order
    async fn lessons_for_module(&self, module_id: ModuleId) -> AcademyResult<Vec<Lesson>>;

    /// A video part together with the course it belongs to
    async fn find_video_part_with_course(
        &self,
        video_part_id: VideoPartId,
    ) -> AcademyResult<Option<(VideoPart, CourseId)>>;
}

/// Enrollment repository trait
#[trait_variant::make(EnrollmentRepository: Send)]
pub trait LocalEnrollmentRepository {
    /// The (user, course) enrollment row regardless of payment status
    async fn find_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<Option<Enrollment>>;

    /// Insert a `free` enrollment for a user
    async fn create_free_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<Enrollment>;

    /// IDs of courses where the user holds an access-granting enrollment
    async fn enrolled_course_ids(&self, user_id: UserId) -> AcademyResult<Vec<CourseId>>;

    /// Access-granting enrollments with course context, for overviews
    async fn enrolled_courses(&self, user_id: UserId) -> AcademyResult<Vec<EnrolledCourse>>;
}

/// Progress repository trait
#[trait_variant::make(ProgressRepository: Send)]
pub trait LocalProgressRepository {
    /// Every ready part of a course in hierarchy order, with the user's
    /// progress joined in (zeros where no row exists)
    async fn course_parts_with_progress(
        &self,
        course_id: CourseId,
        user_id: UserId,
    ) -> AcademyResult<Vec<CoursePart>>;

    /// Every ready part of one module in hierarchy order, with progress
    async fn module_parts_with_progress(
        &self,
        module_id: ModuleId,
        user_id: UserId,
    ) -> AcademyResult<Vec<CoursePart>>;

    /// The user's progress row for one video part
    async fn find_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
    ) -> AcademyResult<Option<UserProgress>>;

    /// Insert or update the watch position (non-completing write)
    async fn upsert_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        progress_seconds: i64,
        at: DateTime<Utc>,
    ) -> AcademyResult<UserProgress>;

    /// Insert or update with completion set; progress pinned to duration
    async fn mark_complete(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        duration_seconds: i64,
        at: DateTime<Utc>,
    ) -> AcademyResult<UserProgress>;

    /// Zero the row in place; returns false when no row exists
    async fn reset_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        at: DateTime<Utc>,
    ) -> AcademyResult<bool>;

    /// Most recently watched videos, newest first
    async fn recent_activity(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> AcademyResult<Vec<RecentActivity>>;
}
