//! Academy Routers
//!
//! Two routers sharing one state: `/api/courses/...` and
//! `/api/progress/...`. Nesting happens in the API binary.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use auth::PgAuthRepository;
use auth::domain::repository::UserRepository;
use platform::token::AccessTokenCodec;

use crate::application::config::MediaConfig;
use crate::domain::repository::{CatalogRepository, EnrollmentRepository, ProgressRepository};
use crate::infra::postgres::PgAcademyRepository;
use crate::presentation::handlers::{self, AcademyAppState};

/// Create both academy routers with PostgreSQL repositories
///
/// Returns `(courses, progress)`; the two share one state so the media
/// signing material is configured exactly once.
pub fn academy_routers(
    repo: PgAcademyRepository,
    auth_repo: PgAuthRepository,
    codec: AccessTokenCodec,
    media: MediaConfig,
) -> (Router, Router) {
    let state = AcademyAppState {
        repo: Arc::new(repo),
        auth_repo: Arc::new(auth_repo),
        codec: Arc::new(codec),
        media: Arc::new(media),
    };

    (
        courses_router(state.clone()),
        progress_router(state),
    )
}

/// Create the courses router for any repository implementations
pub fn courses_router<R, A>(state: AcademyAppState<R, A>) -> Router
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::list_courses::<R, A>))
        .route("/{slug}", get(handlers::course_detail::<R, A>))
        .route(
            "/{slug}/modules/{module_id}/lessons",
            get(handlers::module_lessons::<R, A>),
        )
        .route(
            "/{slug}/video/{video_part_id}",
            get(handlers::video_url::<R, A>),
        )
        .route("/{slug}/enroll", post(handlers::enroll::<R, A>))
        .with_state(state)
}

/// Create the progress router for any repository implementations
pub fn progress_router<R, A>(state: AcademyAppState<R, A>) -> Router
where
    R: CatalogRepository + EnrollmentRepository + ProgressRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::progress_overview::<R, A>))
        .route(
            "/course/{course_id}",
            get(handlers::course_progress::<R, A>),
        )
        .route(
            "/{video_part_id}",
            post(handlers::report_progress::<R, A>)
                .delete(handlers::reset_progress::<R, A>),
        )
        .route(
            "/{video_part_id}/complete",
            post(handlers::mark_complete::<R, A>),
        )
        .with_state(state)
}
