//! Progress Overview Use Case
//!
//! The learner dashboard: overall statistics, a rollup per enrolled
//! course, and the most recently watched videos.

use std::sync::Arc;

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::repository::{
    EnrolledCourse, EnrollmentRepository, ProgressRepository, RecentActivity,
};
use crate::domain::rollup::{self, Totals};
use crate::error::AcademyResult;

/// How many recent-activity entries the dashboard shows
const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Rollup for one enrolled course
pub struct CourseRollup {
    pub course: EnrolledCourse,
    pub totals: Totals,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Progress overview output
pub struct ProgressOverviewOutput {
    pub enrolled_courses: i64,
    pub completed_videos: i64,
    pub total_watch_seconds: i64,
    pub courses: Vec<CourseRollup>,
    pub recent_activity: Vec<RecentActivity>,
}

/// Progress overview use case
pub struct ProgressOverviewUseCase<E, P>
where
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    enrollments: Arc<E>,
    progress: Arc<P>,
}

impl<E, P> ProgressOverviewUseCase<E, P>
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

    pub async fn execute(&self, user_id: UserId) -> AcademyResult<ProgressOverviewOutput> {
        let enrolled = self.enrollments.enrolled_courses(user_id).await?;

        let mut courses = Vec::with_capacity(enrolled.len());
        let mut completed_videos = 0;
        let mut total_watch_seconds = 0;

        for course in enrolled {
            let parts = self
                .progress
                .course_parts_with_progress(course.course_id, user_id)
                .await?;

            let totals = rollup::totals(&parts);
            completed_videos += totals.completed_videos;
            total_watch_seconds += totals.watched_seconds;

            let last_activity = parts.iter().filter_map(|p| p.last_watched_at).max();

            courses.push(CourseRollup {
                course,
                totals,
                last_activity,
            });
        }

        // Most recent activity first, untouched courses last
        courses.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));

        let recent_activity = self
            .progress
            .recent_activity(user_id, RECENT_ACTIVITY_LIMIT)
            .await?;

        Ok(ProgressOverviewOutput {
            enrolled_courses: courses.len() as i64,
            completed_videos,
            total_watch_seconds,
            courses,
            recent_activity,
        })
    }
}
