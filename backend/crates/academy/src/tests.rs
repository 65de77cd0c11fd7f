//! Unit tests for the academy crate
//!
//! Use-case tests run against an in-memory repository that mirrors the
//! Postgres queries (ready-only parts, hierarchy ordering, sticky
//! completion guard), so gate and progress semantics are covered
//! without a database.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use auth::models::user_id::UserId;
use chrono::{DateTime, Duration, Utc};

use crate::application::config::MediaConfig;
use crate::application::{
    CourseProgressUseCase, EnrollUseCase, MarkCompleteUseCase, ModuleLessonsUseCase,
    PlaybackUrlUseCase, ProgressOverviewUseCase, ReportProgressUseCase, ResetProgressUseCase,
    ensure_enrollment,
    gate::ensure_video_access,
};
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
use crate::error::{AcademyError, AcademyResult};

// ============================================================================
// In-memory repository
// ============================================================================

#[derive(Default)]
struct MemoryAcademy {
    courses: Vec<Course>,
    modules: Vec<CourseModule>,
    lessons: Vec<Lesson>,
    parts: Vec<VideoPart>,
    enrollments: Mutex<Vec<Enrollment>>,
    progress: Mutex<Vec<UserProgress>>,
    next_enrollment_id: AtomicI64,
    next_progress_id: AtomicI64,
}

impl MemoryAcademy {
    fn course_of_part(&self, part: &VideoPart) -> CourseId {
        let lesson = self
            .lessons
            .iter()
            .find(|l| l.lesson_id == part.lesson_id)
            .expect("part has a lesson");
        self.modules
            .iter()
            .find(|m| m.module_id == lesson.module_id)
            .expect("lesson has a module")
            .course_id
    }

    fn enroll(&self, user_id: UserId, course_id: CourseId, status: PaymentStatus) {
        self.enroll_with_expiry(user_id, course_id, status, None);
    }

    fn enroll_with_expiry(
        &self,
        user_id: UserId,
        course_id: CourseId,
        status: PaymentStatus,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let mut enrollments = self.enrollments.lock().unwrap();
        let id = self.next_enrollment_id.fetch_add(1, Ordering::SeqCst);
        enrollments.push(Enrollment {
            enrollment_id: EnrollmentId::from_i64(id),
            user_id,
            course_id,
            payment_status: status,
            enrolled_at: Utc::now(),
            expires_at,
        });
    }

    fn ordered_ready_parts(&self, filter: impl Fn(&CourseModule) -> bool) -> Vec<&VideoPart> {
        let mut modules: Vec<&CourseModule> = self.modules.iter().filter(|m| filter(m)).collect();
        modules.sort_by_key(|m| (m.sort_order, m.module_number));

        let mut out = Vec::new();
        for module in modules {
            let mut lessons: Vec<&Lesson> = self
                .lessons
                .iter()
                .filter(|l| l.module_id == module.module_id)
                .collect();
            lessons.sort_by_key(|l| (l.sort_order, l.lesson_number));

            for lesson in lessons {
                let mut parts: Vec<&VideoPart> = self
                    .parts
                    .iter()
                    .filter(|p| p.lesson_id == lesson.lesson_id && p.status.is_ready())
                    .collect();
                parts.sort_by_key(|p| p.part_number);
                out.extend(parts);
            }
        }
        out
    }

    fn to_course_part(&self, part: &VideoPart, user_id: UserId) -> CoursePart {
        let lesson = self
            .lessons
            .iter()
            .find(|l| l.lesson_id == part.lesson_id)
            .unwrap();
        let module = self
            .modules
            .iter()
            .find(|m| m.module_id == lesson.module_id)
            .unwrap();

        let progress = self
            .progress
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.video_part_id == part.video_part_id)
            .cloned();

        CoursePart {
            module_id: module.module_id,
            module_number: module.module_number,
            module_title: module.title.clone(),
            lesson_id: lesson.lesson_id,
            lesson_number: lesson.lesson_number,
            lesson_title: lesson.title.clone(),
            video_part_id: part.video_part_id,
            part_number: part.part_number,
            video_title: part.title.clone(),
            duration_seconds: part.duration_seconds,
            progress_seconds: progress.as_ref().map_or(0, |p| p.progress_seconds),
            completed: progress.as_ref().is_some_and(|p| p.completed),
            completed_at: progress.as_ref().and_then(|p| p.completed_at),
            last_watched_at: progress.as_ref().and_then(|p| p.last_watched_at),
        }
    }
}

impl CatalogRepository for MemoryAcademy {
    async fn list_published_courses(&self) -> AcademyResult<Vec<CourseOverview>> {
        Ok(self
            .courses
            .iter()
            .filter(|c| c.is_published)
            .map(|c| CourseOverview {
                course: c.clone(),
                module_count: self
                    .modules
                    .iter()
                    .filter(|m| m.course_id == c.course_id)
                    .count() as i64,
                lesson_count: 0,
                total_duration_seconds: 0,
            })
            .collect())
    }

    async fn find_course_by_slug(&self, slug: &str) -> AcademyResult<Option<Course>> {
        Ok(self
            .courses
            .iter()
            .find(|c| c.slug.as_str() == slug)
            .cloned())
    }

    async fn find_course_by_id(&self, course_id: CourseId) -> AcademyResult<Option<Course>> {
        Ok(self
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
            .cloned())
    }

    async fn modules_for_course(&self, course_id: CourseId) -> AcademyResult<Vec<ModuleOverview>> {
        Ok(self
            .modules
            .iter()
            .filter(|m| m.course_id == course_id)
            .map(|m| ModuleOverview {
                module: m.clone(),
                lesson_count: 0,
                total_duration_seconds: 0,
            })
            .collect())
    }

    async fn find_module_in_course(
        &self,
        module_id: ModuleId,
        course_id: CourseId,
    ) -> AcademyResult<Option<CourseModule>> {
        Ok(self
            .modules
            .iter()
            .find(|m| m.module_id == module_id && m.course_id == course_id)
            .cloned())
    }

    async fn lessons_for_module(&self, module_id: ModuleId) -> AcademyResult<Vec<Lesson>> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.module_id == module_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.sort_order, l.lesson_number));
        Ok(lessons)
    }

    async fn find_video_part_with_course(
        &self,
        video_part_id: VideoPartId,
    ) -> AcademyResult<Option<(VideoPart, CourseId)>> {
        Ok(self
            .parts
            .iter()
            .find(|p| p.video_part_id == video_part_id)
            .map(|p| (p.clone(), self.course_of_part(p))))
    }
}

impl EnrollmentRepository for MemoryAcademy {
    async fn find_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<Option<Enrollment>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn create_free_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> AcademyResult<Enrollment> {
        self.enroll(user_id, course_id, PaymentStatus::Free);
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("just inserted"))
    }

    async fn enrolled_course_ids(&self, user_id: UserId) -> AcademyResult<Vec<CourseId>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.payment_status.grants_access())
            .map(|e| e.course_id)
            .collect())
    }

    async fn enrolled_courses(&self, user_id: UserId) -> AcademyResult<Vec<EnrolledCourse>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.payment_status.grants_access())
            .map(|e| {
                let course = self
                    .courses
                    .iter()
                    .find(|c| c.course_id == e.course_id)
                    .unwrap();
                EnrolledCourse {
                    course_id: course.course_id,
                    slug: course.slug.as_str().to_string(),
                    title: course.title.clone(),
                    enrolled_at: e.enrolled_at,
                }
            })
            .collect())
    }
}

impl ProgressRepository for MemoryAcademy {
    async fn course_parts_with_progress(
        &self,
        course_id: CourseId,
        user_id: UserId,
    ) -> AcademyResult<Vec<CoursePart>> {
        Ok(self
            .ordered_ready_parts(|m| m.course_id == course_id)
            .into_iter()
            .map(|p| self.to_course_part(p, user_id))
            .collect())
    }

    async fn module_parts_with_progress(
        &self,
        module_id: ModuleId,
        user_id: UserId,
    ) -> AcademyResult<Vec<CoursePart>> {
        Ok(self
            .ordered_ready_parts(|m| m.module_id == module_id)
            .into_iter()
            .map(|p| self.to_course_part(p, user_id))
            .collect())
    }

    async fn find_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
    ) -> AcademyResult<Option<UserProgress>> {
        Ok(self
            .progress
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.video_part_id == video_part_id)
            .cloned())
    }

    async fn upsert_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        progress_seconds: i64,
        at: DateTime<Utc>,
    ) -> AcademyResult<UserProgress> {
        let mut rows = self.progress.lock().unwrap();
        if let Some(row) = rows
            .iter_mut()
            .find(|p| p.user_id == user_id && p.video_part_id == video_part_id)
        {
            // Sticky-completion guard, as in the SQL implementation
            if !row.completed {
                row.progress_seconds = progress_seconds;
                row.last_watched_at = Some(at);
                row.updated_at = at;
            }
            return Ok(row.clone());
        }

        let id = self.next_progress_id.fetch_add(1, Ordering::SeqCst);
        let row = UserProgress {
            progress_id: ProgressId::from_i64(id),
            user_id,
            video_part_id,
            progress_seconds,
            completed: false,
            completed_at: None,
            last_watched_at: Some(at),
            updated_at: at,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn mark_complete(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        duration_seconds: i64,
        at: DateTime<Utc>,
    ) -> AcademyResult<UserProgress> {
        let mut rows = self.progress.lock().unwrap();
        if let Some(row) = rows
            .iter_mut()
            .find(|p| p.user_id == user_id && p.video_part_id == video_part_id)
        {
            row.progress_seconds = duration_seconds;
            row.completed = true;
            row.completed_at = Some(at);
            row.last_watched_at = Some(at);
            row.updated_at = at;
            return Ok(row.clone());
        }

        let id = self.next_progress_id.fetch_add(1, Ordering::SeqCst);
        let row = UserProgress {
            progress_id: ProgressId::from_i64(id),
            user_id,
            video_part_id,
            progress_seconds: duration_seconds,
            completed: true,
            completed_at: Some(at),
            last_watched_at: Some(at),
            updated_at: at,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn reset_progress(
        &self,
        user_id: UserId,
        video_part_id: VideoPartId,
        at: DateTime<Utc>,
    ) -> AcademyResult<bool> {
        let mut rows = self.progress.lock().unwrap();
        match rows
            .iter_mut()
            .find(|p| p.user_id == user_id && p.video_part_id == video_part_id)
        {
            Some(row) => {
                row.progress_seconds = 0;
                row.completed = false;
                row.completed_at = None;
                row.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn recent_activity(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> AcademyResult<Vec<RecentActivity>> {
        let mut rows: Vec<UserProgress> = self
            .progress
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.last_watched_at.cmp(&a.last_watched_at));
        rows.truncate(limit as usize);

        Ok(rows
            .into_iter()
            .map(|p| {
                let part = self
                    .parts
                    .iter()
                    .find(|v| v.video_part_id == p.video_part_id)
                    .unwrap();
                let lesson = self
                    .lessons
                    .iter()
                    .find(|l| l.lesson_id == part.lesson_id)
                    .unwrap();
                let module = self
                    .modules
                    .iter()
                    .find(|m| m.module_id == lesson.module_id)
                    .unwrap();
                let course = self
                    .courses
                    .iter()
                    .find(|c| c.course_id == module.course_id)
                    .unwrap();
                RecentActivity {
                    progress_id: p.progress_id.get(),
                    progress_seconds: p.progress_seconds,
                    completed: p.completed,
                    last_watched_at: p.last_watched_at,
                    video_part_id: part.video_part_id.get(),
                    part_number: part.part_number,
                    video_title: part.title.clone(),
                    duration_seconds: part.duration_seconds,
                    lesson_id: lesson.lesson_id.get(),
                    lesson_number: lesson.lesson_number,
                    lesson_title: lesson.title.clone(),
                    module_id: module.module_id.get(),
                    module_number: module.module_number,
                    module_title: module.title.clone(),
                    course_id: course.course_id.get(),
                    course_slug: course.slug.as_str().to_string(),
                    course_title: course.title.clone(),
                }
            })
            .collect())
    }
}

// ============================================================================
// Fixture
// ============================================================================

const USER: UserId = UserId::from_i64(1);
const FREE_COURSE: CourseId = CourseId::from_i64(1);
const PAID_COURSE: CourseId = CourseId::from_i64(2);

const READY_PART: VideoPartId = VideoPartId::from_i64(1);
const PENDING_PART: VideoPartId = VideoPartId::from_i64(2);
const SECOND_READY_PART: VideoPartId = VideoPartId::from_i64(3);

/// One published free course: module 0 with lesson "0.1 Welcome"
/// (ready 180s part + pending 120s part) and lesson "0.2 Setup"
/// (ready 60s part); one published paid course; one unpublished course.
fn fixture() -> Arc<MemoryAcademy> {
    let now = Utc::now();

    let course = |id: i64, slug: &str, price: i64, published: bool| Course {
        course_id: CourseId::from_i64(id),
        slug: Slug::from_db(slug),
        title: format!("Course {}", id),
        description: None,
        price_cents: price,
        is_published: published,
        created_at: now,
    };

    let lesson = |id: i64, module: i64, number: i32, title: &str, duration: i64| Lesson {
        lesson_id: LessonId::from_i64(id),
        module_id: ModuleId::from_i64(module),
        lesson_number: number,
        title: title.to_string(),
        description: None,
        duration_seconds: duration,
        sort_order: number,
        is_preview: false,
    };

    let part = |id: i64, lesson: i64, number: i32, status: VideoStatus, duration: i64| VideoPart {
        video_part_id: VideoPartId::from_i64(id),
        lesson_id: LessonId::from_i64(lesson),
        part_number: number,
        title: Some(format!("Part {}", id)),
        object_key: format!("videos/{}.mp4", id),
        status,
        duration_seconds: duration,
    };

    Arc::new(MemoryAcademy {
        courses: vec![
            course(1, "ai-launchpad-academy", 0, true),
            course(2, "enterprise-deployment", 99700, true),
            course(3, "hidden-course", 0, false),
        ],
        modules: vec![CourseModule {
            module_id: ModuleId::from_i64(1),
            course_id: FREE_COURSE,
            module_number: 0,
            title: "Welcome & Setup".to_string(),
            description: None,
            sort_order: 0,
        }],
        lessons: vec![
            lesson(1, 1, 1, "0.1 Welcome", 300),
            lesson(2, 1, 2, "0.2 Setup", 60),
        ],
        parts: vec![
            part(1, 1, 1, VideoStatus::Ready, 180),
            part(2, 1, 2, VideoStatus::Pending, 120),
            part(3, 2, 1, VideoStatus::Ready, 60),
        ],
        next_enrollment_id: AtomicI64::new(1),
        next_progress_id: AtomicI64::new(1),
        ..Default::default()
    })
}

fn report_use_case(
    repo: &Arc<MemoryAcademy>,
) -> ReportProgressUseCase<MemoryAcademy, MemoryAcademy, MemoryAcademy> {
    ReportProgressUseCase::new(repo.clone(), repo.clone(), repo.clone())
}

fn complete_use_case(
    repo: &Arc<MemoryAcademy>,
) -> MarkCompleteUseCase<MemoryAcademy, MemoryAcademy, MemoryAcademy> {
    MarkCompleteUseCase::new(repo.clone(), repo.clone(), repo.clone())
}

// ============================================================================
// Enrollment gate
// ============================================================================

#[tokio::test]
async fn gate_distinguishes_missing_course_enrollment_and_expiry() {
    let repo = fixture();

    let unknown = ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "no-such-course").await;
    assert!(matches!(unknown, Err(AcademyError::CourseNotFound)));

    let not_enrolled =
        ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "ai-launchpad-academy").await;
    assert!(matches!(not_enrolled, Err(AcademyError::NotEnrolled)));

    // A pending payment does not qualify
    repo.enroll(USER, PAID_COURSE, PaymentStatus::Pending);
    let pending =
        ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "enterprise-deployment").await;
    assert!(matches!(pending, Err(AcademyError::NotEnrolled)));

    // Expired enrollments exist but grant nothing
    repo.enroll_with_expiry(
        USER,
        FREE_COURSE,
        PaymentStatus::Free,
        Some(Utc::now() - Duration::days(1)),
    );
    let expired =
        ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "ai-launchpad-academy").await;
    assert!(matches!(expired, Err(AcademyError::EnrollmentExpired)));
}

#[tokio::test]
async fn gate_returns_course_and_enrollment_on_success() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    let access = ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "ai-launchpad-academy")
        .await
        .unwrap();
    assert_eq!(access.course.course_id, FREE_COURSE);
    assert_eq!(access.enrollment.user_id, USER);
}

#[tokio::test]
async fn video_gate_collapses_all_denials() {
    let repo = fixture();

    // Unknown video and unenrolled video read identically
    let unknown =
        ensure_video_access(repo.as_ref(), repo.as_ref(), USER, VideoPartId::from_i64(999)).await;
    assert!(matches!(unknown, Err(AcademyError::VideoAccessDenied)));

    let unenrolled = ensure_video_access(repo.as_ref(), repo.as_ref(), USER, READY_PART).await;
    assert!(matches!(unenrolled, Err(AcademyError::VideoAccessDenied)));

    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);
    let (part, course_id) = ensure_video_access(repo.as_ref(), repo.as_ref(), USER, READY_PART)
        .await
        .unwrap();
    assert_eq!(part.video_part_id, READY_PART);
    assert_eq!(course_id, FREE_COURSE);
}

// ============================================================================
// Enroll
// ============================================================================

#[tokio::test]
async fn free_enroll_succeeds_once_then_conflicts() {
    let repo = fixture();
    let use_case = EnrollUseCase::new(repo.clone(), repo.clone());

    let output = use_case.execute(USER, "ai-launchpad-academy").await.unwrap();
    assert_eq!(output.course.course_id, FREE_COURSE);
    assert_eq!(output.enrollment.payment_status, PaymentStatus::Free);

    let again = use_case.execute(USER, "ai-launchpad-academy").await;
    assert!(matches!(again, Err(AcademyError::AlreadyEnrolled)));
}

#[tokio::test]
async fn paid_and_hidden_courses_refuse_self_enroll() {
    let repo = fixture();
    let use_case = EnrollUseCase::new(repo.clone(), repo.clone());

    let paid = use_case.execute(USER, "enterprise-deployment").await;
    assert!(matches!(paid, Err(AcademyError::PaymentRequired)));

    let hidden = use_case.execute(USER, "hidden-course").await;
    assert!(matches!(hidden, Err(AcademyError::CourseNotFound)));

    let unknown = use_case.execute(USER, "nope").await;
    assert!(matches!(unknown, Err(AcademyError::CourseNotFound)));
}

// ============================================================================
// Progress reporting
// ============================================================================

#[tokio::test]
async fn report_progress_validates_and_caps() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);
    let use_case = report_use_case(&repo);

    let negative = use_case.execute(USER, READY_PART, -5.0).await;
    assert!(matches!(negative, Err(AcademyError::Validation(_))));

    let nan = use_case.execute(USER, READY_PART, f64::NAN).await;
    assert!(matches!(nan, Err(AcademyError::Validation(_))));

    // 90 of 180 seconds
    let output = use_case.execute(USER, READY_PART, 90.0).await.unwrap();
    assert_eq!(output.progress_seconds, 90);
    assert_eq!(output.duration_seconds, 180);
    assert_eq!(output.percent_complete, 50);

    // Over-reporting caps at the duration
    let output = use_case.execute(USER, READY_PART, 900.0).await.unwrap();
    assert_eq!(output.progress_seconds, 180);
    assert_eq!(output.percent_complete, 100);
}

#[tokio::test]
async fn report_progress_requires_enrollment() {
    let repo = fixture();
    let use_case = report_use_case(&repo);

    let denied = use_case.execute(USER, READY_PART, 10.0).await;
    assert!(matches!(denied, Err(AcademyError::VideoAccessDenied)));
}

#[tokio::test]
async fn completion_is_sticky_until_reset() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    complete_use_case(&repo)
        .execute(USER, READY_PART)
        .await
        .unwrap();

    // A later ordinary report does not move the needle and does not error
    let echoed = report_use_case(&repo)
        .execute(USER, READY_PART, 10.0)
        .await
        .unwrap();
    assert_eq!(echoed.progress_seconds, 180);

    let row = repo.find_progress(USER, READY_PART).await.unwrap().unwrap();
    assert!(row.completed);
    assert_eq!(row.progress_seconds, 180);

    // Reset clears both position and completion
    ResetProgressUseCase::new(repo.clone(), repo.clone(), repo.clone())
        .execute(USER, READY_PART)
        .await
        .unwrap();

    let row = repo.find_progress(USER, READY_PART).await.unwrap().unwrap();
    assert!(!row.completed);
    assert_eq!(row.progress_seconds, 0);
    assert!(row.completed_at.is_none());
}

#[tokio::test]
async fn reset_without_a_row_is_not_found() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    let use_case = ResetProgressUseCase::new(repo.clone(), repo.clone(), repo.clone());
    let missing = use_case.execute(USER, READY_PART).await;
    assert!(matches!(missing, Err(AcademyError::ProgressNotFound)));

    // Without an enrollment the row is reported missing, not forbidden
    let other_user = UserId::from_i64(2);
    let unenrolled = use_case.execute(other_user, READY_PART).await;
    assert!(matches!(unenrolled, Err(AcademyError::ProgressNotFound)));
}

#[tokio::test]
async fn mark_complete_reports_lesson_and_course_completion() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);
    let use_case = complete_use_case(&repo);

    // Lesson 1 has one ready part (the pending one does not count),
    // so completing it finishes the lesson but not the course
    let output = use_case.execute(USER, READY_PART).await.unwrap();
    assert!(output.lesson_complete);
    assert!(!output.course_complete);
    assert!(output.completed_at.is_some());

    // Completing the remaining ready part finishes the course
    let output = use_case.execute(USER, SECOND_READY_PART).await.unwrap();
    assert!(output.lesson_complete);
    assert!(output.course_complete);
}

// ============================================================================
// Aggregation scenarios
// ============================================================================

#[tokio::test]
async fn half_watched_then_completed_course_progress() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    // 90s into the 180s part; the 60s part untouched: 90/240 = 38%
    report_use_case(&repo)
        .execute(USER, READY_PART, 90.0)
        .await
        .unwrap();

    let use_case = CourseProgressUseCase::new(repo.clone(), repo.clone());
    let output = use_case.execute(USER, FREE_COURSE).await.unwrap();

    let lesson_one = &output.modules[0];
    assert_eq!(lesson_one.totals.percent(), 38);

    // Only the touched part shows in the videos list
    assert_eq!(output.videos.len(), 1);
    assert_eq!(output.videos[0].video_part_id, READY_PART);

    // Next video is the half-watched one, resuming at 90s
    let next = output.next_video.unwrap();
    assert_eq!(next.video_part_id, READY_PART);
    assert_eq!(next.progress_seconds, 90);

    // Complete everything: 100%, no next video
    complete_use_case(&repo).execute(USER, READY_PART).await.unwrap();
    complete_use_case(&repo)
        .execute(USER, SECOND_READY_PART)
        .await
        .unwrap();

    let output = use_case.execute(USER, FREE_COURSE).await.unwrap();
    assert_eq!(output.modules[0].totals.percent(), 100);
    assert!(output.modules[0].totals.is_complete());
    assert!(output.next_video.is_none());
}

#[tokio::test]
async fn course_progress_requires_enrollment() {
    let repo = fixture();

    let use_case = CourseProgressUseCase::new(repo.clone(), repo.clone());
    let denied = use_case.execute(USER, FREE_COURSE).await;
    assert!(matches!(denied, Err(AcademyError::NotEnrolled)));

    repo.enroll_with_expiry(
        USER,
        FREE_COURSE,
        PaymentStatus::Free,
        Some(Utc::now() - Duration::days(1)),
    );
    let expired = use_case.execute(USER, FREE_COURSE).await;
    assert!(matches!(expired, Err(AcademyError::EnrollmentExpired)));
}

#[tokio::test]
async fn pending_parts_never_appear_in_listings_or_totals() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    let access = ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "ai-launchpad-academy")
        .await
        .unwrap();

    let use_case = ModuleLessonsUseCase::new(repo.clone(), repo.clone());
    let output = use_case
        .execute(&access, ModuleId::from_i64(1), USER)
        .await
        .unwrap();

    let welcome = &output.lessons[0];
    assert_eq!(welcome.lesson.title, "0.1 Welcome");
    // The 120s pending part is invisible
    assert_eq!(welcome.parts.len(), 1);
    assert_eq!(welcome.totals.total_seconds, 180);

    // Unknown module under the right course is a 404
    let missing = use_case.execute(&access, ModuleId::from_i64(99), USER).await;
    assert!(matches!(missing, Err(AcademyError::ModuleNotFound)));
}

#[tokio::test]
async fn overview_rolls_up_courses_and_recent_activity() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    report_use_case(&repo)
        .execute(USER, READY_PART, 60.0)
        .await
        .unwrap();
    complete_use_case(&repo)
        .execute(USER, SECOND_READY_PART)
        .await
        .unwrap();

    let use_case = ProgressOverviewUseCase::new(repo.clone(), repo.clone());
    let output = use_case.execute(USER).await.unwrap();

    assert_eq!(output.enrolled_courses, 1);
    assert_eq!(output.completed_videos, 1);
    // 60 watched + 60 completed
    assert_eq!(output.total_watch_seconds, 120);

    assert_eq!(output.courses.len(), 1);
    assert_eq!(output.courses[0].totals.percent(), 50);
    assert!(output.courses[0].last_activity.is_some());

    assert_eq!(output.recent_activity.len(), 2);
}

// ============================================================================
// Playback
// ============================================================================

#[tokio::test]
async fn playback_url_is_gated_and_ready_only() {
    let repo = fixture();
    repo.enroll(USER, FREE_COURSE, PaymentStatus::Free);

    let access = ensure_enrollment(repo.as_ref(), repo.as_ref(), USER, "ai-launchpad-academy")
        .await
        .unwrap();

    let media = Arc::new(MediaConfig::development());
    let use_case = PlaybackUrlUseCase::new(repo.clone(), media.clone());

    let output = use_case.execute(&access, READY_PART).await.unwrap();
    assert!(output.url.contains("videos/1.mp4"));
    assert!(output.url.contains("signature="));
    assert_eq!(output.duration_seconds, 180);
    assert_eq!(output.expires_in, 4 * 3600);

    // Pending parts are not playable
    let pending = use_case.execute(&access, PENDING_PART).await;
    assert!(matches!(pending, Err(AcademyError::VideoNotFound)));

    // Unknown parts are not playable
    let unknown = use_case.execute(&access, VideoPartId::from_i64(999)).await;
    assert!(matches!(unknown, Err(AcademyError::VideoNotFound)));
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[test]
fn error_status_codes_match_the_taxonomy() {
    use axum::http::StatusCode;

    assert_eq!(AcademyError::CourseNotFound.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AcademyError::ModuleNotFound.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AcademyError::VideoNotFound.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AcademyError::ProgressNotFound.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AcademyError::NotEnrolled.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AcademyError::EnrollmentExpired.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AcademyError::VideoAccessDenied.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AcademyError::AlreadyEnrolled.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AcademyError::PaymentRequired.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        AcademyError::Validation("x".into()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AcademyError::Auth(auth::AuthError::TokenExpired).status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AcademyError::Auth(auth::AuthError::AccountDisabled).status_code(),
        StatusCode::FORBIDDEN
    );
}
