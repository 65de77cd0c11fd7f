//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::models::user_id::UserId;
use auth::presentation::middleware::{authenticate, authenticate_optional};
use kernel::response::Envelope;
use platform::token::AccessTokenCodec;

use crate::application::config::MediaConfig;
use crate::application::{
    CourseDetailUseCase, CourseProgressUseCase, EnrollUseCase, ListCoursesUseCase,
    MarkCompleteUseCase, ModuleLessonsUseCase, PlaybackUrlUseCase, ProgressOverviewUseCase,
    ReportProgressUseCase, ResetProgressUseCase, ensure_enrollment,
};
use crate::domain::repository::{CatalogRepository, EnrollmentRepository, ProgressRepository};
use crate::domain::value_object::ids::{CourseId, ModuleId, VideoPartId};
use crate::error::AcademyResult;
use crate::presentation::dto::{
    CourseDetailResponse, CourseListItemDto, CourseProgressResponse, EnrollResponse,
    MarkCompleteResponse, ModuleLessonsResponse, PlaybackUrlResponse, ProgressOverviewResponse,
    ReportProgressRequest, ReportProgressResponse,
};

/// Shared state for academy handlers
///
/// `R` is the academy store; `A` is the auth store used to resolve the
/// bearer token into a user on every request.
#[derive(Clone)]
pub struct AcademyAppState<R, A>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub auth_repo: Arc<A>,
    pub codec: Arc<AccessTokenCodec>,
    pub media: Arc<MediaConfig>,
}

impl<R, A> AcademyAppState<R, A>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    async fn current_user(&self, headers: &HeaderMap) -> AcademyResult<UserId> {
        let user = authenticate(self.auth_repo.as_ref(), &self.codec, headers).await?;
        Ok(user.user_id)
    }

    async fn current_user_optional(&self, headers: &HeaderMap) -> Option<UserId> {
        authenticate_optional(self.auth_repo.as_ref(), &self.codec, headers)
            .await
            .map(|user| user.user_id)
    }
}

// ============================================================================
// Courses
// ============================================================================

/// GET /api/courses
pub async fn list_courses<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let viewer = state.current_user_optional(&headers).await;

    let use_case = ListCoursesUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case.execute(viewer).await?;

    let courses: Vec<CourseListItemDto> = output
        .courses
        .iter()
        .map(|(overview, is_enrolled)| CourseListItemDto::from_overview(overview, *is_enrolled))
        .collect();

    Ok(Envelope::ok(courses))
}

/// GET /api/courses/:slug
pub async fn course_detail<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let viewer = state.current_user_optional(&headers).await;

    let use_case =
        CourseDetailUseCase::new(state.repo.clone(), state.repo.clone(), state.repo.clone());
    let output = use_case.execute(&slug, viewer).await?;

    Ok(Envelope::ok(CourseDetailResponse::from(output)))
}

/// GET /api/courses/:slug/modules/:module_id/lessons
pub async fn module_lessons<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path((slug, module_id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let access =
        ensure_enrollment(state.repo.as_ref(), state.repo.as_ref(), user_id, &slug).await?;

    let use_case = ModuleLessonsUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case
        .execute(&access, ModuleId::from_i64(module_id), user_id)
        .await?;

    Ok(Envelope::ok(ModuleLessonsResponse::from(output)))
}

/// GET /api/courses/:slug/video/:video_part_id
pub async fn video_url<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path((slug, video_part_id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let access =
        ensure_enrollment(state.repo.as_ref(), state.repo.as_ref(), user_id, &slug).await?;

    let use_case = PlaybackUrlUseCase::new(state.repo.clone(), state.media.clone());
    let output = use_case
        .execute(&access, VideoPartId::from_i64(video_part_id))
        .await?;

    Ok(Envelope::ok(PlaybackUrlResponse::from(output)))
}

/// POST /api/courses/:slug/enroll
pub async fn enroll<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let use_case = EnrollUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case.execute(user_id, &slug).await?;

    Ok((
        StatusCode::CREATED,
        Envelope::ok(EnrollResponse::from(output))
            .with_message("Successfully enrolled in course"),
    ))
}

// ============================================================================
// Progress
// ============================================================================

/// GET /api/progress
pub async fn progress_overview<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let use_case = ProgressOverviewUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case.execute(user_id).await?;

    Ok(Envelope::ok(ProgressOverviewResponse::from(output)))
}

/// GET /api/progress/course/:course_id
pub async fn course_progress<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path(course_id): Path<i64>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let use_case = CourseProgressUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case
        .execute(user_id, CourseId::from_i64(course_id))
        .await?;

    Ok(Envelope::ok(CourseProgressResponse::from(output)))
}

/// POST /api/progress/:video_part_id
pub async fn report_progress<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path(video_part_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<ReportProgressRequest>,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    // Anything non-numeric falls through as NaN and is rejected by the
    // use case with the canonical message
    let progress_seconds = req.progress_seconds.as_f64().unwrap_or(f64::NAN);

    let use_case =
        ReportProgressUseCase::new(state.repo.clone(), state.repo.clone(), state.repo.clone());
    let output = use_case
        .execute(user_id, VideoPartId::from_i64(video_part_id), progress_seconds)
        .await?;

    Ok(Envelope::ok(ReportProgressResponse::from(output)))
}

/// POST /api/progress/:video_part_id/complete
pub async fn mark_complete<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path(video_part_id): Path<i64>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let use_case =
        MarkCompleteUseCase::new(state.repo.clone(), state.repo.clone(), state.repo.clone());
    let output = use_case
        .execute(user_id, VideoPartId::from_i64(video_part_id))
        .await?;

    Ok(Envelope::ok(MarkCompleteResponse::from(output)))
}

/// DELETE /api/progress/:video_part_id
pub async fn reset_progress<R, A>(
    State(state): State<AcademyAppState<R, A>>,
    Path(video_part_id): Path<i64>,
    headers: HeaderMap,
) -> AcademyResult<impl IntoResponse>
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.current_user(&headers).await?;

    let use_case =
        ResetProgressUseCase::new(state.repo.clone(), state.repo.clone(), state.repo.clone());
    use_case
        .execute(user_id, VideoPartId::from_i64(video_part_id))
        .await?;

    Ok(Envelope::ack("Progress reset successfully"))
}
