//! PostgreSQL Repository Implementations
//!
//! Row structs mirror table shapes; mapping into domain entities
//! happens in one place per row type.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::course::Course;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::entity::lesson::Lesson;
use crate::domain::entity::module::CourseModule;
use crate::domain::entity::progress::UserProgress;
use crate::domain::entity::video_part::VideoPart;
use crate::domain::repository::{
    CatalogRepository, CourseOverview, EnrolledCourse, EnrollmentRepository, ModuleOverview,
    ProgressRepository, RecentActivity,
};
use crate::domain::rollup::CoursePart;
use crate::domain::value_object::ids::{
    CourseId, EnrollmentId, LessonId, ModuleId, ProgressId, VideoPartId,
};
use crate::domain::value_object::payment_status::PaymentStatus;
use crate::domain::value_object::slug::Slug;
use crate::domain::value_object::video_status::VideoStatus;
use crate::error::AcademyResult;

/// PostgreSQL-backed academy repository
#[derive(Clone)]
pub struct PgAcademyRepository {
    pool: PgPool,
}

impl PgAcademyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: i64,
    slug: String,
    title: String,
    description: Option<String>,
    price_cents: i64,
    is_published: bool,
    created_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> Course {
        Course {
            course_id: CourseId::from_i64(self.id),
            slug: Slug::from_db(self.slug),
            title: self.title,
            description: self.description,
            price_cents: self.price_cents,
            is_published: self.is_published,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CourseOverviewRow {
    id: i64,
    slug: String,
    title: String,
    description: Option<String>,
    price_cents: i64,
    is_published: bool,
    created_at: DateTime<Utc>,
    module_count: i64,
    lesson_count: i64,
    total_duration_seconds: i64,
}

#[derive(sqlx::FromRow)]
struct ModuleRow {
    id: i64,
    course_id: i64,
    module_number: i32,
    title: String,
    description: Option<String>,
    sort_order: i32,
}

impl ModuleRow {
    fn into_module(self) -> CourseModule {
        CourseModule {
            module_id: ModuleId::from_i64(self.id),
            course_id: CourseId::from_i64(self.course_id),
            module_number: self.module_number,
            title: self.title,
            description: self.description,
            sort_order: self.sort_order,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ModuleOverviewRow {
    id: i64,
    course_id: i64,
    module_number: i32,
    title: String,
    description: Option<String>,
    sort_order: i32,
    lesson_count: i64,
    total_duration_seconds: i64,
}

#[derive(sqlx::FromRow)]
struct LessonRow {
    id: i64,
    module_id: i64,
    lesson_number: i32,
    title: String,
    description: Option<String>,
    duration_seconds: i64,
    sort_order: i32,
    is_preview: bool,
}

impl LessonRow {
    fn into_lesson(self) -> Lesson {
        Lesson {
            lesson_id: LessonId::from_i64(self.id),
            module_id: ModuleId::from_i64(self.module_id),
            lesson_number: self.lesson_number,
            title: self.title,
            description: self.description,
            duration_seconds: self.duration_seconds,
            sort_order: self.sort_order,
            is_preview: self.is_preview,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VideoPartWithCourseRow {
    id: i64,
    lesson_id: i64,
    part_number: i32,
    title: Option<String>,
    object_key: String,
    status: String,
    duration_seconds: i64,
    course_id: i64,
}

impl VideoPartWithCourseRow {
    fn into_pair(self) -> (VideoPart, CourseId) {
        (
            VideoPart {
                video_part_id: VideoPartId::from_i64(self.id),
                lesson_id: LessonId::from_i64(self.lesson_id),
                part_number: self.part_number,
                title: self.title,
                object_key: self.object_key,
                status: VideoStatus::from_db(&self.status),
                duration_seconds: self.duration_seconds,
            },
            CourseId::from_i64(self.course_id),
        )
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: i64,
    user_id: i64,
    course_id: i64,
    payment_status: String,
    enrolled_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl EnrollmentRow {
    fn into_enrollment(self) -> Enrollment {
        Enrollment {
            enrollment_id: EnrollmentId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            course_id: CourseId::from_i64(self.course_id),
            payment_status: PaymentStatus::from_db(&self.payment_status),
            enrolled_at: self.enrolled_at,
            expires_at: self.expires_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    id: i64,
    user_id: i64,
    video_part_id: i64,
    progress_seconds: i64,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    last_watched_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl ProgressRow {
    fn into_progress(self) -> UserProgress {
        UserProgress {
            progress_id: ProgressId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            video_part_id: VideoPartId::from_i64(self.video_part_id),
            progress_seconds: self.progress_seconds,
            completed: self.completed,
            completed_at: self.completed_at,
            last_watched_at: self.last_watched_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CoursePartRow {
    module_id: i64,
    module_number: i32,
    module_title: String,
    lesson_id: i64,
    lesson_number: i32,
    lesson_title: String,
    video_part_id: i64,
    part_number: i32,
    video_title: Option<String>,
    duration_seconds: i64,
    progress_seconds: i64,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    last_watched_at: Option<DateTime<Utc>>,
}

impl CoursePartRow {
    fn into_part(self) -> CoursePart {
        CoursePart {
            module_id: ModuleId::from_i64(self.module_id),
            module_number: self.module_number,
            module_title: self.module_title,
            lesson_id: LessonId::from_i64(self.lesson_id),
            lesson_number: self.lesson_number,
            lesson_title: self.lesson_title,
            video_part_id: VideoPartId::from_i64(self.video_part_id),
            part_number: self.part_number,
            video_title: self.video_title,
            duration_seconds: self.duration_seconds,
            progress_seconds: self.progress_seconds,
            completed: self.completed,
            completed_at: self.completed_at,
            last_watched_at: self.last_watched_at,
        }
    }
}

/// Ready parts of a course or module with one user's progress joined
/// in; the argument picks the filter column for `$1`.
macro_rules! parts_query {
    ($filter:literal) => {
        concat!(
            "SELECT \
                 m.id AS module_id, \
                 m.module_number, \
                 m.title AS module_title, \
                 l.id AS lesson_id, \
                 l.lesson_number, \
                 l.title AS lesson_title, \
                 vp.id AS video_part_id, \
                 vp.part_number, \
                 vp.title AS video_title, \
                 vp.duration_seconds, \
                 COALESCE(up.progress_seconds, 0) AS progress_seconds, \
                 COALESCE(up.completed, FALSE) AS completed, \
                 up.completed_at, \
                 up.last_watched_at \
             FROM modules m \
             JOIN lessons l ON l.module_id = m.id \
             JOIN video_parts vp ON vp.lesson_id = l.id AND vp.status = 'ready' \
             LEFT JOIN user_progress up \
                 ON up.video_part_id = vp.id AND up.user_id = $2 \
             WHERE ",
            $filter,
            " = $1 \
             ORDER BY m.sort_order, m.module_number, l.sort_order, l.lesson_number, \
                      vp.part_number"
        )
    };
}

// ============================================================================
// Catalog Repository Implementation
// ============================================================================

const COURSE_COLUMNS: &str =
    "id, slug, title, description, price_cents, is_published, created_at";

impl CatalogRepository for PgAcademyRepository {
    async fn list_published_courses(&self) -> AcademyResult<Vec<CourseOverview>> {
        let rows = sqlx::query_as::<_, CourseOverviewRow>(
            "SELECT \
                 c.id, c.slug, c.title, c.description, c.price_cents, \
                 c.is_published, c.created_at, \
                 COUNT(DISTINCT m.id) AS module_count, \
                 COUNT(DISTINCT l.id) AS lesson_count, \
                 COALESCE(SUM(l.duration_seconds), 0)::BIGINT AS total_duration_seconds \
             FROM courses c \
             LEFT JOIN modules m ON m.course_id = c.id \
             LEFT JOIN lessons l ON l.module_id = m.id \
             WHERE c.is_published = TRUE \
             GROUP BY c.id \
             ORDER BY c.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CourseOverview {
                course: CourseRow {
                    id: r.id,
                    slug: r.slug,
                    title: r.title,
                    description: r.description,
                    price_cents: r.price_cents,
                    is_published: r.is_published,
                    created_at: r.created_at,
                }
                .into_course(),
                module_count: r.module_count,
                lesson_count: r.lesson_count,
                total_duration_seconds: r.total_duration_seconds,
            })
            .collect())
    }

    async fn find_course_by_slug(&self, slug: &str) -> AcademyResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn find_course_by_id(&self, course_id: CourseId) -> AcademyResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(course_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn modules_for_course(&self, course_id: CourseId) -> AcademyResult<Vec<ModuleOverview>> {
        let rows = sqlx::query_as::<_, ModuleOverviewRow>(
            "SELECT \
                 m.id, m.course_id, m.module_number, m.title, m.description, m.sort_order, \
                 COUNT(l.id) AS lesson_count, \
                 COALESCE(SUM(l.duration_seconds), 0)::BIGINT AS total_duration_seconds \
             FROM modules m \
             LEFT JOIN lessons l ON l.module_id = m.id \
             WHERE m.course_id = $1 \
             GROUP BY m.id \
             ORDER BY m.sort_order ASC, m.module_number ASC",
        )
        .bind(course_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ModuleOverview {
                module: ModuleRow {
                    id: r.id,
                    course_id: r.course_id,
                    module_number: r.module_number,
                    title: r.title,
                    description: r.description,
                    sort_order: r.sort_order,
                }
                .into_module(),
                lesson_count: r.lesson_count,
                total_duration_seconds: r.total_duration_seconds,
            })
            .collect())
    }

    async fn find_module_in_course(
        &self,
        module_id: ModuleId,
        course_id: CourseId,
    ) -> AcademyResult<Option<CourseModule>> {
        let row = sqlx::query_as::<_, ModuleRow>(
            "SELECT id, course_id, module_number, title, description, sort_order \
             FROM modules \
             WHERE id = $1 AND course_id = $2",
        )
        .bind(module_id.get())
        .bind(course_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ModuleRow::into_module))
    }

    async fn lessons_for_module(&self, module_id: ModuleId) -> AcademyResult<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, LessonRow>(
            "SELECT id, module_id, lesson_number, title, description, \
                    duration_seconds, sort_order, is_preview \
             FROM lessons \
             WHERE module_id = $1 \
             ORDER BY sort_order ASC, lesson_number ASC",
        )
        .bind(module_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LessonRow::into_lesson).collect())
    }

    async fn find_video_part_with_course(
        &self,
        video_part_id: VideoPartId,
    ) -> AcademyResult<Option<(VideoPart, CourseId)>> {
        let row = sqlx::query_as::<_, VideoPartWithCourseRow>(
            "SELECT vp.id, vp.lesson_id, vp.part_number, vp.title, vp.object_key, \
                    vp.status, vp.duration_seconds, m.course_id \
             FROM video_parts vp \
             JOIN lessons l ON l.id = vp.lesson_id \
             JOIN modules m ON m.id = l.module_id \
             WHERE vp.id = $1",
        )
        .bind(video_part_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(VideoPartWithCourseRow::into_pair))
    }
}

// ============================================================================
// Enrollment Repository Implementation
// ============================================================================

impl EnrollmentRepository for PgAcademyRepository {
    async fn find_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT id, user_id, course_id, payment_status, enrolled_at, expires_at \
             FROM enrollments \
             WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id.get())
        .bind(course_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EnrollmentRow::into_enrollment))
    }

    async fn create_free_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<Enrollment> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "INSERT INTO enrollments (user_id, course_id, payment_status) \
             VALUES ($1, $2, 'free') \
             RETURNING id, user_id, course_id, payment_status, enrolled_at, expires_at",
        )
        .bind(user_id.get())
        .bind(course_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_enrollment())
    }

    async fn enrolled_course_ids(&self, user_id: UserId) -> AcademyResult<Vec<CourseId>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT course_id FROM enrollments \
             WHERE user_id = $1 AND payment_status IN ('completed', 'free')",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(CourseId::from_i64).collect())
    }

    async fn enrolled_courses(&self, user_id: UserId) -> AcademyResult<Vec<EnrolledCourse>> {
        #[derive(sqlx::FromRow)]
        struct EnrolledCourseRow {
            course_id: i64,
            slug: String,
            title: String,
            enrolled_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, EnrolledCourseRow>(
            "SELECT c.id AS course_id, c.slug, c.title, e.enrolled_at \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.user_id = $1 AND e.payment_status IN ('completed', 'free') \
             ORDER BY e.enrolled_at",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| EnrolledCourse {
                course_id: CourseId::from_i64(r.course_id),
                slug: r.slug,
                title: r.title,
                enrolled_at: r.enrolled_at,
            })
            .collect())
    }
}

// ============================================================================
// Progress Repository Implementation
// ============================================================================

const PROGRESS_COLUMNS: &str = "id, user_id, video_part_id, progress_seconds, \
                                completed, completed_at, last_watched_at, updated_at";

impl ProgressRepository for PgAcademyRepository {
    async fn course_parts_with_progress(
        &self,
        course_id: CourseId,
        user_id: UserId,
    ) -> AcademyResult<Vec<CoursePart>> {
        let rows = sqlx::query_as::<_, CoursePartRow>(parts_query!("m.course_id"))
            .bind(course_id.get())
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CoursePartRow::into_part).collect())
    }

    async fn module_parts_with_progress(
        &self,
        module_id: ModuleId,
        user_id: UserId,
    ) -> AcademyResult<Vec<CoursePart>> {
        let rows = sqlx::query_as::<_, CoursePartRow>(parts_query!("m.id"))
            .bind(module_id.get())
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CoursePartRow::into_part).collect())
    }

    async fn find_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
    ) -> AcademyResult<Option<UserProgress>> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_progress \
             WHERE user_id = $1 AND video_part_id = $2"
        ))
        .bind(user_id.get())
        .bind(video_part_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProgressRow::into_progress))
    }

    async fn upsert_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        progress_seconds: i64,
        at: DateTime<Utc>,
    ) -> AcademyResult<UserProgress> {
        // The WHERE guard keeps completion sticky even when two writes
        // race: a completed row swallows the update and is re-read
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "INSERT INTO user_progress \
                 (user_id, video_part_id, progress_seconds, last_watched_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) \
             ON CONFLICT (user_id, video_part_id) DO UPDATE SET \
                 progress_seconds = EXCLUDED.progress_seconds, \
                 last_watched_at = EXCLUDED.last_watched_at, \
                 updated_at = EXCLUDED.updated_at \
             WHERE user_progress.completed = FALSE \
             RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(user_id.get())
        .bind(video_part_id.get())
        .bind(progress_seconds)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into_progress()),
            // Guard fired: the row is completed, return it untouched
            None => {
                let row = sqlx::query_as::<_, ProgressRow>(&format!(
                    "SELECT {PROGRESS_COLUMNS} FROM user_progress \
                     WHERE user_id = $1 AND video_part_id = $2"
                ))
                .bind(user_id.get())
                .bind(video_part_id.get())
                .fetch_one(&self.pool)
                .await?;
                Ok(row.into_progress())
            }
        }
    }

    async fn mark_complete(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        duration_seconds: i64,
        at: DateTime<Utc>,
    ) -> AcademyResult<UserProgress> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "INSERT INTO user_progress \
                 (user_id, video_part_id, progress_seconds, completed, completed_at, \
                  last_watched_at, updated_at) \
             VALUES ($1, $2, $3, TRUE, $4, $4, $4) \
             ON CONFLICT (user_id, video_part_id) DO UPDATE SET \
                 progress_seconds = EXCLUDED.progress_seconds, \
                 completed = TRUE, \
                 completed_at = EXCLUDED.completed_at, \
                 last_watched_at = EXCLUDED.last_watched_at, \
                 updated_at = EXCLUDED.updated_at \
             RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(user_id.get())
        .bind(video_part_id.get())
        .bind(duration_seconds)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_progress())
    }

    async fn reset_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        at: DateTime<Utc>,
    ) -> AcademyResult<bool> {
        let affected = sqlx::query(
            "UPDATE user_progress SET \
                 progress_seconds = 0, \
                 completed = FALSE, \
                 completed_at = NULL, \
                 updated_at = $3 \
             WHERE user_id = $1 AND video_part_id = $2",
        )
        .bind(user_id.get())
        .bind(video_part_id.get())
        .bind(at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn recent_activity(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> AcademyResult<Vec<RecentActivity>> {
        #[derive(sqlx::FromRow)]
        struct RecentActivityRow {
            progress_id: i64,
            progress_seconds: i64,
            completed: bool,
            last_watched_at: Option<DateTime<Utc>>,
            video_part_id: i64,
            part_number: i32,
            video_title: Option<String>,
            duration_seconds: i64,
            lesson_id: i64,
            lesson_number: i32,
            lesson_title: String,
            module_id: i64,
            module_number: i32,
            module_title: String,
            course_id: i64,
            course_slug: String,
            course_title: String,
        }

        let rows = sqlx::query_as::<_, RecentActivityRow>(
            "SELECT \
                 up.id AS progress_id, \
                 up.progress_seconds, \
                 up.completed, \
                 up.last_watched_at, \
                 vp.id AS video_part_id, \
                 vp.part_number, \
                 vp.title AS video_title, \
                 vp.duration_seconds, \
                 l.id AS lesson_id, \
                 l.lesson_number, \
                 l.title AS lesson_title, \
                 m.id AS module_id, \
                 m.module_number, \
                 m.title AS module_title, \
                 c.id AS course_id, \
                 c.slug AS course_slug, \
                 c.title AS course_title \
             FROM user_progress up \
             JOIN video_parts vp ON vp.id = up.video_part_id \
             JOIN lessons l ON l.id = vp.lesson_id \
             JOIN modules m ON m.id = l.module_id \
             JOIN courses c ON c.id = m.course_id \
             WHERE up.user_id = $1 \
             ORDER BY up.last_watched_at DESC NULLS LAST \
             LIMIT $2",
        )
        .bind(user_id.get())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RecentActivity {
                progress_id: r.progress_id,
                progress_seconds: r.progress_seconds,
                completed: r.completed,
                last_watched_at: r.last_watched_at,
                video_part_id: r.video_part_id,
                part_number: r.part_number,
                video_title: r.video_title,
                duration_seconds: r.duration_seconds,
                lesson_id: r.lesson_id,
                lesson_number: r.lesson_number,
                lesson_title: r.lesson_title,
                module_id: r.module_id,
                module_number: r.module_number,
                module_title: r.module_title,
                course_id: r.course_id,
                course_slug: r.course_slug,
                course_title: r.course_title,
            })
            .collect())
    }
}
